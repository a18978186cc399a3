// Tax status derived from the last registration date
use super::date::{parse_date, CalendarDate};
use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Records expiring within this many days are due soon
pub const DUE_SOON_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(rename = "due today")]
    DueToday,
    #[serde(rename = "due soon")]
    DueSoon,
    #[serde(rename = "current")]
    Current,
}

impl TaxStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaxStatus::Pending => "pending",
            TaxStatus::Overdue => "overdue",
            TaxStatus::DueToday => "due today",
            TaxStatus::DueSoon => "due soon",
            TaxStatus::Current => "current",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "pending" => Some(TaxStatus::Pending),
            "overdue" => Some(TaxStatus::Overdue),
            "due today" => Some(TaxStatus::DueToday),
            "due soon" => Some(TaxStatus::DueSoon),
            "current" => Some(TaxStatus::Current),
            _ => None,
        }
    }
}

impl fmt::Display for TaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tax expires one calendar year after registration.
/// A 29 February registration expires on 28 February.
pub fn expiry_date(registered: CalendarDate) -> Option<NaiveDate> {
    registered.to_naive().checked_add_months(Months::new(12))
}

/// Signed days from `today` until expiry; negative once expired
pub fn gap_days(registered: CalendarDate, today: NaiveDate) -> Option<i64> {
    expiry_date(registered).map(|expiry| (expiry - today).num_days())
}

pub fn classify(registered: CalendarDate, today: NaiveDate) -> TaxStatus {
    match gap_days(registered, today) {
        None => TaxStatus::Pending,
        Some(gap) if gap < 0 => TaxStatus::Overdue,
        Some(0) => TaxStatus::DueToday,
        Some(gap) if gap <= DUE_SOON_WINDOW_DAYS => TaxStatus::DueSoon,
        Some(_) => TaxStatus::Current,
    }
}

/// Classify a free-form registration date; unreadable dates are pending
pub fn classify_register_date(register_date: &str, today: NaiveDate) -> TaxStatus {
    parse_date(register_date)
        .map(|registered| classify(registered, today))
        .unwrap_or(TaxStatus::Pending)
}
