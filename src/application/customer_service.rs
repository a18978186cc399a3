// Customer service - Use cases for editing customer records
use crate::application::cache::TtlCache;
use crate::application::clock::Clock;
use crate::application::customer_repository::{CustomerRepository, RepositoryError};
use crate::domain::customer::{CustomerDraft, CustomerPatch, CustomerRecord};
use crate::domain::dashboard::TimedSummary;
use crate::domain::status::TaxStatus;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Customer {0} not found")]
    NotFound(String),
    #[error("Customer {0} already exists")]
    Conflict(String),
    #[error(transparent)]
    Store(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(plate) => ServiceError::NotFound(plate),
            RepositoryError::Conflict(plate) => ServiceError::Conflict(plate),
            other => ServiceError::Store(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub status: Option<TaxStatus>,
    pub query: Option<String>,
}

#[derive(Clone)]
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
    dashboard_cache: Arc<TtlCache<TimedSummary>>,
}

impl CustomerService {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        clock: Arc<dyn Clock>,
        dashboard_cache: Arc<TtlCache<TimedSummary>>,
    ) -> Self {
        Self {
            repository,
            clock,
            dashboard_cache,
        }
    }

    pub async fn list(&self, filter: &CustomerFilter) -> ServiceResult<Vec<CustomerRecord>> {
        let customers = self.repository.list_customers().await?;
        Ok(customers
            .into_iter()
            .filter(|c| {
                filter
                    .status
                    .is_none_or(|status| TaxStatus::from_label(&c.status) == Some(status))
            })
            .filter(|c| filter.query.as_deref().is_none_or(|q| c.matches(q)))
            .collect())
    }

    pub async fn get(&self, license_plate: &str) -> ServiceResult<CustomerRecord> {
        self.repository
            .get_customer(license_plate)
            .await?
            .ok_or_else(|| ServiceError::NotFound(license_plate.to_string()))
    }

    pub async fn create(&self, draft: CustomerDraft) -> ServiceResult<CustomerRecord> {
        let mut record = CustomerRecord::from_draft(draft);
        if record.license_plate.is_empty() {
            return Err(ServiceError::Validation("licensePlate is required".to_string()));
        }
        if record.customer_name.is_empty() {
            return Err(ServiceError::Validation("customerName is required".to_string()));
        }

        record.refresh_status(self.clock.today());
        self.repository.insert_customer(&record).await?;
        tracing::info!("Created customer {} ({})", record.license_plate, record.status);

        self.dashboard_cache.invalidate().await;
        Ok(record)
    }

    pub async fn update(
        &self,
        license_plate: &str,
        patch: CustomerPatch,
    ) -> ServiceResult<CustomerRecord> {
        if patch.customer_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ServiceError::Validation("customerName cannot be empty".to_string()));
        }

        let mut record = self.get(license_plate).await?;
        record.apply(patch);
        self.save(record).await
    }

    pub async fn delete(&self, license_plate: &str) -> ServiceResult<()> {
        if !self.repository.delete_customer(license_plate).await? {
            return Err(ServiceError::NotFound(license_plate.to_string()));
        }
        tracing::info!("Deleted customer {}", license_plate);

        self.dashboard_cache.invalidate().await;
        Ok(())
    }

    pub async fn add_tag(&self, license_plate: &str, tag: &str) -> ServiceResult<CustomerRecord> {
        if tag.trim().is_empty() {
            return Err(ServiceError::Validation("tag cannot be empty".to_string()));
        }

        let mut record = self.get(license_plate).await?;
        if !record.add_tag(tag) {
            return Ok(record);
        }
        self.save(record).await
    }

    pub async fn remove_tag(&self, license_plate: &str, tag: &str) -> ServiceResult<CustomerRecord> {
        if tag.trim().is_empty() {
            return Err(ServiceError::Validation("tag cannot be empty".to_string()));
        }

        let mut record = self.get(license_plate).await?;
        if !record.remove_tag(tag) {
            return Ok(record);
        }
        self.save(record).await
    }

    /// Status is re-derived on every write
    async fn save(&self, mut record: CustomerRecord) -> ServiceResult<CustomerRecord> {
        record.refresh_status(self.clock.today());
        self.repository.update_customer(&record).await?;
        tracing::debug!("Updated customer {} ({})", record.license_plate, record.status);

        self.dashboard_cache.invalidate().await;
        Ok(record)
    }
}
