// Dashboard summary domain model
use serde::Serialize;

/// Most customers listed as paying next year
pub const NEXT_YEAR_LIST_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextYearEntry {
    pub license_plate: String,
    pub customer_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_customers: u64,
    pub this_month_renewals: u64,
    pub upcoming_expiry: u64,
    pub overdue_count: u64,
    pub already_taxed: u64,
    pub next_year_tax: Vec<NextYearEntry>,
}

/// A summary plus how long the pass over the store took
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSummary {
    pub summary: DashboardSummary,
    pub duration_ms: u64,
}
