// Customer domain model
use super::status::classify_register_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub license_plate: String,
    pub customer_name: String,
    #[serde(default)]
    pub register_date: String,
    #[serde(default)]
    pub inspection_date: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The fields the dashboard needs from each record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub license_plate: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub register_date: String,
    #[serde(default)]
    pub status: String,
}

impl CustomerSummary {
    /// Field names to request from the store
    pub const FIELDS: [&'static str; 4] =
        ["licensePlate", "customerName", "registerDate", "status"];
}

impl From<&CustomerRecord> for CustomerSummary {
    fn from(record: &CustomerRecord) -> Self {
        Self {
            license_plate: record.license_plate.clone(),
            customer_name: record.customer_name.clone(),
            register_date: record.register_date.clone(),
            status: record.status.clone(),
        }
    }
}

/// Payload for creating a customer; status is always derived
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub license_plate: String,
    pub customer_name: String,
    #[serde(default)]
    pub register_date: String,
    #[serde(default)]
    pub inspection_date: String,
    #[serde(default)]
    pub vehicle_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub customer_name: Option<String>,
    pub register_date: Option<String>,
    pub inspection_date: Option<String>,
    pub vehicle_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl CustomerRecord {
    pub fn from_draft(draft: CustomerDraft) -> Self {
        Self {
            license_plate: draft.license_plate.trim().to_string(),
            customer_name: draft.customer_name.trim().to_string(),
            register_date: draft.register_date,
            inspection_date: draft.inspection_date,
            vehicle_type: draft.vehicle_type,
            status: String::new(),
            tags: normalize_tags(draft.tags),
        }
    }

    pub fn apply(&mut self, patch: CustomerPatch) {
        if let Some(name) = patch.customer_name {
            self.customer_name = name.trim().to_string();
        }
        if let Some(date) = patch.register_date {
            self.register_date = date;
        }
        if let Some(date) = patch.inspection_date {
            self.inspection_date = date;
        }
        if let Some(kind) = patch.vehicle_type {
            self.vehicle_type = kind;
        }
        if let Some(tags) = patch.tags {
            self.tags = normalize_tags(tags);
        }
    }

    /// Re-derive the cached status label; returns true if it changed
    pub fn refresh_status(&mut self, today: NaiveDate) -> bool {
        let label = classify_register_date(&self.register_date, today).label();
        if self.status == label {
            return false;
        }
        self.status = label.to_string();
        true
    }

    /// Returns false if the tag was already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Returns false if the tag was not present
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag.trim());
        self.tags.len() != before
    }

    /// Case-insensitive match on plate or name
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.license_plate.to_lowercase().contains(&query)
            || self.customer_name.to_lowercase().contains(&query)
    }
}

/// Trim, drop empties and keep the first occurrence of each tag
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}
