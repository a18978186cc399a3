// Dashboard service - Use case for the customer summary
use crate::application::cache::TtlCache;
use crate::application::clock::Clock;
use crate::application::customer_repository::{CustomerRepository, RepositoryResult};
use crate::domain::customer::CustomerSummary;
use crate::domain::dashboard::{DashboardSummary, NextYearEntry, TimedSummary, NEXT_YEAR_LIST_LIMIT};
use crate::domain::date::parse_date;
use crate::domain::status::TaxStatus;
use chrono::{Datelike, NaiveDate};
use std::sync::Arc;
use std::time::Instant;

/// Count one pass over the customer projection.
///
/// Status buckets read the stored label; they are not re-derived here.
pub fn summarize<'a, I>(customers: I, today: NaiveDate) -> DashboardSummary
where
    I: IntoIterator<Item = &'a CustomerSummary>,
{
    let mut summary = DashboardSummary::default();
    let next_year = today.year() + 1;

    for customer in customers {
        summary.total_customers += 1;

        if let Some(registered) = parse_date(&customer.register_date) {
            if registered.year() == today.year() && registered.month() == today.month() {
                summary.this_month_renewals += 1;
            }
            if registered.year() == next_year && summary.next_year_tax.len() < NEXT_YEAR_LIST_LIMIT {
                summary.next_year_tax.push(NextYearEntry {
                    license_plate: customer.license_plate.clone(),
                    customer_name: customer.customer_name.clone(),
                });
            }
        }

        match TaxStatus::from_label(&customer.status) {
            Some(TaxStatus::DueSoon | TaxStatus::DueToday) => summary.upcoming_expiry += 1,
            Some(TaxStatus::Overdue) => summary.overdue_count += 1,
            Some(TaxStatus::Current) => summary.already_taxed += 1,
            Some(TaxStatus::Pending) | None => {}
        }
    }

    summary
}

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn CustomerRepository>,
    clock: Arc<dyn Clock>,
    cache: Arc<TtlCache<TimedSummary>>,
}

impl DashboardService {
    pub fn new(
        repository: Arc<dyn CustomerRepository>,
        clock: Arc<dyn Clock>,
        cache: Arc<TtlCache<TimedSummary>>,
    ) -> Self {
        Self {
            repository,
            clock,
            cache,
        }
    }

    /// Cached summary unless `fresh` is set or the TTL has passed
    pub async fn get_summary(&self, fresh: bool) -> RepositoryResult<TimedSummary> {
        if !fresh {
            if let Some(cached) = self.cache.get().await {
                tracing::debug!("Serving dashboard summary from cache");
                return Ok(cached);
            }
        }

        let generation = self.cache.generation().await;
        let start_time = Instant::now();

        let customers = self.repository.list_summaries().await?;
        let summary = summarize(&customers, self.clock.today());

        let timed = TimedSummary {
            summary,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        tracing::info!(
            "Dashboard summary over {} customers took {}ms",
            timed.summary.total_customers,
            timed.duration_ms
        );

        self.cache.put(generation, timed.clone()).await;
        Ok(timed)
    }
}
