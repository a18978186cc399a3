// Repository trait for customer data access
use crate::domain::customer::{CustomerRecord, CustomerSummary};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Customer {0} not found")]
    NotFound(String),
    #[error("Customer {0} already exists")]
    Conflict(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Unexpected store response: {0}")]
    Protocol(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Narrow projection of every record, in storage order
    async fn list_summaries(&self) -> RepositoryResult<Vec<CustomerSummary>>;

    /// Every full record, in storage order
    async fn list_customers(&self) -> RepositoryResult<Vec<CustomerRecord>>;

    async fn get_customer(&self, license_plate: &str) -> RepositoryResult<Option<CustomerRecord>>;

    /// Fails with `Conflict` if the plate is taken
    async fn insert_customer(&self, record: &CustomerRecord) -> RepositoryResult<()>;

    /// Fails with `NotFound` if the plate is unknown
    async fn update_customer(&self, record: &CustomerRecord) -> RepositoryResult<()>;

    /// Returns false if nothing was deleted
    async fn delete_customer(&self, license_plate: &str) -> RepositoryResult<bool>;
}
