// Maintenance service - Idempotent bulk fixes over stored customers
use crate::application::cache::TtlCache;
use crate::application::clock::Clock;
use crate::application::customer_repository::{CustomerRepository, RepositoryResult};
use crate::domain::dashboard::TimedSummary;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshReport {
    pub scanned: usize,
    pub changed: usize,
    pub written: usize,
}

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
    dashboard_cache: Arc<TtlCache<TimedSummary>>,
}

impl MaintenanceService {
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

    /// Re-derive every stored status for today and write back the ones
    /// that drifted. A second run on the same day writes nothing.
    pub async fn refresh_statuses(&self, dry_run: bool) -> RepositoryResult<RefreshReport> {
        let today = self.clock.today();
        let mut report = RefreshReport::default();

        for mut customer in self.repository.list_customers().await? {
            report.scanned += 1;
            let previous = customer.status.clone();
            if !customer.refresh_status(today) {
                continue;
            }
            report.changed += 1;
            tracing::info!(
                "{}: {:?} -> {:?}{}",
                customer.license_plate,
                previous,
                customer.status,
                if dry_run { " (dry run)" } else { "" }
            );

            if !dry_run {
                if let Err(e) = self.repository.update_customer(&customer).await {
                    if report.written > 0 {
                        self.dashboard_cache.invalidate().await;
                    }
                    return Err(e);
                }
                report.written += 1;
            }
        }

        if report.written > 0 {
            self.dashboard_cache.invalidate().await;
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::ManualClock;
    use crate::application::customer_repository::RepositoryError;
    use crate::domain::customer::{CustomerRecord, CustomerSummary};
    use crate::infrastructure::memory_repository::MemoryRepository;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeDelta};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Accepts `budget` updates, then reports the store as down
    struct FailingWrites {
        inner: MemoryRepository,
        budget: AtomicUsize,
    }

    #[async_trait]
    impl CustomerRepository for FailingWrites {
        async fn list_summaries(&self) -> RepositoryResult<Vec<CustomerSummary>> {
            self.inner.list_summaries().await
        }

        async fn list_customers(&self) -> RepositoryResult<Vec<CustomerRecord>> {
            self.inner.list_customers().await
        }

        async fn get_customer(&self, plate: &str) -> RepositoryResult<Option<CustomerRecord>> {
            self.inner.get_customer(plate).await
        }

        async fn insert_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
            self.inner.insert_customer(record).await
        }

        async fn update_customer(&self, record: &CustomerRecord) -> RepositoryResult<()> {
            let left = self.budget.load(Ordering::SeqCst);
            if left == 0 {
                return Err(RepositoryError::Unavailable("connection reset".to_string()));
            }
            self.budget.store(left - 1, Ordering::SeqCst);
            self.inner.update_customer(record).await
        }

        async fn delete_customer(&self, plate: &str) -> RepositoryResult<bool> {
            self.inner.delete_customer(plate).await
        }
    }

    fn record(plate: &str, register_date: &str, status: &str) -> CustomerRecord {
        CustomerRecord {
            license_plate: plate.to_string(),
            customer_name: "Test".to_string(),
            register_date: register_date.to_string(),
            inspection_date: String::new(),
            vehicle_type: "car".to_string(),
            status: status.to_string(),
            tags: Vec::new(),
        }
    }

    async fn setup() -> (MaintenanceService, Arc<MemoryRepository>, Arc<ManualClock>) {
        let repository = Arc::new(MemoryRepository::default());
        for r in [
            record("A", "01/01/2024", "current"),
            record("B", "01/01/2024", "overdue"),
            record("C", "", ""),
            record("D", "2024-04-20", "current"),
        ] {
            repository.insert_customer(&r).await.unwrap();
        }

        let clock = Arc::new(ManualClock::at(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        let cache = Arc::new(TtlCache::new(clock.clone(), Duration::from_secs(60)));
        let service = MaintenanceService::new(repository.clone(), clock.clone(), cache);
        (service, repository, clock)
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let (service, repository, _clock) = setup().await;

        let report = service.refresh_statuses(false).await.unwrap();
        assert_eq!(report, RefreshReport { scanned: 4, changed: 3, written: 3 });

        let stored = repository.get_customer("D").await.unwrap().unwrap();
        assert_eq!(stored.status, "due soon");
        let stored = repository.get_customer("C").await.unwrap().unwrap();
        assert_eq!(stored.status, "pending");

        let again = service.refresh_statuses(false).await.unwrap();
        assert_eq!(again, RefreshReport { scanned: 4, changed: 0, written: 0 });
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let (service, repository, _clock) = setup().await;

        let report = service.refresh_statuses(true).await.unwrap();
        assert_eq!(report, RefreshReport { scanned: 4, changed: 3, written: 0 });
        let stored = repository.get_customer("A").await.unwrap().unwrap();
        assert_eq!(stored.status, "current");
    }

    #[tokio::test]
    async fn test_refresh_follows_the_calendar() {
        let (service, repository, clock) = setup().await;
        service.refresh_statuses(false).await.unwrap();

        // D expires 2025-04-20
        clock.advance(TimeDelta::days(36));
        let report = service.refresh_statuses(false).await.unwrap();
        assert_eq!(report.changed, 1);
        let stored = repository.get_customer("D").await.unwrap().unwrap();
        assert_eq!(stored.status, "due today");
    }

    #[tokio::test]
    async fn test_partial_refresh_still_invalidates_dashboard() {
        let repository = Arc::new(FailingWrites {
            inner: MemoryRepository::default(),
            budget: AtomicUsize::new(1),
        });
        for r in [
            record("A", "01/01/2024", "current"),
            record("C", "", ""),
        ] {
            repository.insert_customer(&r).await.unwrap();
        }

        let clock = Arc::new(ManualClock::at(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
        let cache = Arc::new(TtlCache::new(clock.clone(), Duration::from_secs(60)));
        let generation = cache.generation().await;
        cache
            .put(generation, TimedSummary {
                summary: Default::default(),
                duration_ms: 1,
            })
            .await;
        assert!(cache.get().await.is_some());

        let service = MaintenanceService::new(repository.clone(), clock, cache.clone());
        assert!(service.refresh_statuses(false).await.is_err());

        // A was written before C failed
        let stored = repository.get_customer("A").await.unwrap().unwrap();
        assert_eq!(stored.status, "overdue");
        assert!(cache.get().await.is_none());
    }
}
