//! Response types returned by the facade
//!
//! Every response carries `success` and a human-readable `message` so
//! agents and the dashboard can treat results uniformly.

use crate::store::Item;
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of a single-item command (add, mark bought, archive, ...)
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    /// Candidates when a name matched more than one item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<Item>>,
}

impl ActionResponse {
    pub fn ok(message: impl Into<String>, item: Item) -> Self {
        Self {
            success: true,
            message: message.into(),
            item: Some(item),
            matches: None,
        }
    }

    pub fn ok_without_item(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            item: None,
            matches: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            item: None,
            matches: None,
        }
    }

    pub fn ambiguous(message: impl Into<String>, matches: Vec<Item>) -> Self {
        Self {
            success: false,
            message: message.into(),
            item: None,
            matches: Some(matches),
        }
    }
}

/// Filters echoed back with a listing, after normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppliedFilters {
    pub status: String,
    pub store: Option<String>,
    pub category: Option<String>,
    pub for_person: Option<String>,
    pub priority: Option<String>,
}

/// Result of list, search and the list shortcuts
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
    pub items: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub message: String,
    pub total_needed: usize,
    pub total_bought: usize,
    pub urgent: usize,
    pub by_category: BTreeMap<String, usize>,
    pub stores: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoresResponse {
    pub success: bool,
    pub message: String,
    pub stores: BTreeMap<String, usize>,
    pub total_stores: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentResponse {
    pub success: bool,
    pub message: String,
    pub days: i64,
    pub count: usize,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub message: String,
    pub added: usize,
    pub skipped: usize,
    pub items: Vec<Item>,
}
