// In-memory repository for local runs and tests
use crate::application::customer_repository::{
    CustomerRepository, RepositoryError, RepositoryResult,
};
use crate::domain::customer::{CustomerRecord, CustomerSummary};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Keeps records in insertion order, like a store's natural iteration
#[derive(Default)]
pub struct MemoryRepository {
    records: RwLock<Vec<CustomerRecord>>,
}

#[async_trait]
impl CustomerRepository for MemoryRepository {
    async fn list_summaries(&self) -> RepositoryResult<Vec<CustomerSummary>> {
        let records = self.records.read().await;
        Ok(records.iter().map(CustomerSummary::from).collect())
    }

    async fn list_customers(&self) -> RepositoryResult<Vec<CustomerRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn get_customer(&self, license_plate: &str) -> RepositoryResult<Option<CustomerRecord>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.license_plate == license_plate)
            .cloned())
    }

    async fn insert_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.license_plate == record.license_plate) {
            return Err(RepositoryError::Conflict(record.license_plate.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.license_plate == record.license_plate)
        {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(record.license_plate.clone())),
        }
    }

    async fn delete_customer(&self, license_plate: &str) -> RepositoryResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.license_plate != license_plate);
        Ok(records.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(plate: &str) -> CustomerRecord {
        CustomerRecord {
            license_plate: plate.to_string(),
            customer_name: format!("Owner {}", plate),
            register_date: "01/01/2025".to_string(),
            inspection_date: String::new(),
            vehicle_type: "car".to_string(),
            status: "current".to_string(),
            tags: vec!["vip".to_string()],
        }
    }

    #[tokio::test]
    async fn test_keeps_insertion_order() {
        let repo = MemoryRepository::default();
        for plate in ["C", "A", "B"] {
            repo.insert_customer(&record(plate)).await.unwrap();
        }

        let summaries = repo.list_summaries().await.unwrap();
        let plates: Vec<_> = summaries.iter().map(|s| s.license_plate.as_str()).collect();
        assert_eq!(plates, vec!["C", "A", "B"]);
        assert_eq!(summaries[0].status, "current");
    }

    #[tokio::test]
    async fn test_conflict_and_not_found() {
        let repo = MemoryRepository::default();
        repo.insert_customer(&record("A")).await.unwrap();

        assert!(matches!(
            repo.insert_customer(&record("A")).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert!(matches!(
            repo.update_customer(&record("Z")).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repo.delete_customer("A").await.unwrap());
        assert!(!repo.delete_customer("A").await.unwrap());
        assert_eq!(repo.get_customer("A").await.unwrap(), None);
    }
}
