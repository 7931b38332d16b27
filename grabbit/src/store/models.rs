//! Store models
//!
//! Rust structs representing item records and the requests that create,
//! change and filter them. All models use serde for the JSON file and
//! the HTTP API.

use super::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Needed,
    Bought,
    Archived,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Needed => "needed",
            Status::Bought => "bought",
            Status::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "needed" => Some(Status::Needed),
            "bought" => Some(Status::Bought),
            "archived" => Some(Status::Archived),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item category. Unknown values in a stored file read as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Groceries,
    Household,
    Clothing,
    Electronics,
    Gifts,
    #[serde(other)]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Groceries => "groceries",
            Category::Household => "household",
            Category::Clothing => "clothing",
            Category::Electronics => "electronics",
            Category::Gifts => "gifts",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item priority. Unknown values in a stored file read as `Medium`.
///
/// Variant order is not the sort order; see `rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    High,
    Urgent,
    #[serde(other)]
    Medium,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Sort rank, higher sorts first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 3,
            Priority::High => 2,
            Priority::Medium => 1,
            Priority::Low => 0,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shopping list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub item: String,
    pub status: Status,
    #[serde(default)]
    pub store: Option<String>,
    pub category: Category,
    pub for_person: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub priority: Priority,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(with = "timestamp")]
    pub added_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub bought_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring: bool,
    pub source: String,
}

impl Item {
    /// Apply a status change, keeping `bought_at` in step with it
    pub(crate) fn apply_status(&mut self, status: Status, now: DateTime<Utc>) {
        self.status = status;
        self.bought_at = match status {
            Status::Bought => Some(now),
            Status::Needed | Status::Archived => None,
        };
    }
}

/// Create item request
///
/// Values are loose strings; the store normalizes them and fills defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    pub item: String,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub for_person: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub source: Option<String>,
}

impl NewItem {
    pub fn named(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            ..Self::default()
        }
    }
}

/// Partial update request. Only fields present are changed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemUpdate {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub for_person: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub recurring: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
}

impl ItemUpdate {
    pub fn is_empty(&self) -> bool {
        self.item.is_none()
            && self.status.is_none()
            && self.store.is_none()
            && self.category.is_none()
            && self.for_person.is_none()
            && self.notes.is_none()
            && self.priority.is_none()
            && self.url.is_none()
            && self.price.is_none()
            && self.recurring.is_none()
            && self.source.is_none()
    }
}

/// Status selector for queries; `All` bypasses status filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Needed,
    Bought,
    Archived,
}

impl StatusFilter {
    /// Parse a filter value. Unknown values fall back to `Needed`.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("all") {
            return StatusFilter::All;
        }
        match Status::parse(value) {
            Some(status) => status.into(),
            None => {
                tracing::debug!("Unknown status filter {:?}, using needed", value);
                StatusFilter::Needed
            }
        }
    }

    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Needed => status == Status::Needed,
            StatusFilter::Bought => status == Status::Bought,
            StatusFilter::Archived => status == Status::Archived,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Needed => "needed",
            StatusFilter::Bought => "bought",
            StatusFilter::Archived => "archived",
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        match status {
            Status::Needed => StatusFilter::Needed,
            Status::Bought => StatusFilter::Bought,
            Status::Archived => StatusFilter::Archived,
        }
    }
}

/// Normalized query filters; `None` fields do not constrain the result
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub status: StatusFilter,
    pub store: Option<String>,
    pub category: Option<Category>,
    pub for_person: Option<String>,
    pub priority: Option<Priority>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if !self.status.matches(item.status) {
            return false;
        }
        if let Some(store) = &self.store {
            match &item.store {
                Some(item_store) if same_name(item_store, store) => {}
                _ => return false,
            }
        }
        if let Some(category) = self.category {
            if item.category != category {
                return false;
            }
        }
        if let Some(person) = &self.for_person {
            if !same_name(&item.for_person, person) {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if item.priority != priority {
                return false;
            }
        }
        true
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
