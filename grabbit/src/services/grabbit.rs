//! Grabbit facade
//!
//! The public operation surface used by the HTTP API, the CLI and agent
//! integrations. Operations never fail on bad input: missing items,
//! ambiguous names and invalid values come back as `success: false`
//! responses. Only storage failures are returned as errors.

use super::import;
use super::responses::*;
use crate::config::{DEFAULT_RECENT_DAYS, MAX_RECENT_DAYS};
use crate::error::{AppError, Result};
use crate::store::{
    normalize, ItemFilter, ItemStore, ItemUpdate, NewItem, Priority, Status, StatusFilter,
};
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeMap;

const NOT_FOUND_MESSAGE: &str = "Couldn't find that item!";

/// Loose listing filters as callers send them
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub for_person: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

/// Shopping list facade over the item store
#[derive(Clone)]
pub struct Grabbit {
    store: ItemStore,
}

impl Grabbit {
    pub fn new(store: ItemStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    // ===== Adding =====

    /// Add an item to grab
    pub async fn add(&self, req: NewItem) -> Result<ActionResponse> {
        tracing::info!("Adding item: {}", req.item);

        match self.store.create(req).await {
            Ok(item) => {
                let message = match &item.store {
                    Some(store) => format!("Grabbed! Added '{}' ({})", item.item, store),
                    None => format!("Grabbed! Added '{}'", item.item),
                };
                tracing::info!("Item added: {}", item.id);
                Ok(ActionResponse::ok(message, item))
            }
            Err(e) => recover(e),
        }
    }

    // ===== Listing & filtering =====

    /// List items, needed ones by default
    pub async fn list(&self, query: ListQuery) -> ListResponse {
        let status = query
            .status
            .as_deref()
            .map(StatusFilter::parse)
            .unwrap_or_default();
        let store = normalize::normalize_store_opt(query.store.as_deref());
        let category = clean(query.category.as_deref()).map(|c| normalize::normalize_category(&c));
        let for_person = clean(query.for_person.as_deref());
        let priority = clean(query.priority.as_deref()).map(|p| normalize::normalize_priority(&p));

        let filter = ItemFilter {
            status,
            store: store.clone(),
            category,
            for_person: for_person.clone(),
            priority,
        };

        let items = self.store.query(&filter).await;
        let message = match items.len() {
            0 => "Nothing to grab!".to_string(),
            1 => "1 item".to_string(),
            n => format!("{} items", n),
        };

        ListResponse {
            success: true,
            message,
            count: items.len(),
            items,
            filters: Some(AppliedFilters {
                status: status.as_str().to_string(),
                store,
                category: category.map(|c| c.as_str().to_string()),
                for_person,
                priority: priority.map(|p| p.as_str().to_string()),
            }),
            query: None,
        }
    }

    /// What is needed at this store
    pub async fn at_store(&self, store: &str) -> ListResponse {
        self.list(ListQuery {
            store: Some(store.to_string()),
            ..ListQuery::default()
        })
        .await
    }

    /// What is needed for this person
    pub async fn for_person(&self, person: &str) -> ListResponse {
        self.list(ListQuery {
            for_person: Some(person.to_string()),
            ..ListQuery::default()
        })
        .await
    }

    /// Needed items marked urgent
    pub async fn urgent(&self) -> ListResponse {
        self.list(ListQuery {
            priority: Some(Priority::Urgent.as_str().to_string()),
            ..ListQuery::default()
        })
        .await
    }

    /// Search names and notes across every status
    pub async fn search(&self, text: &str) -> ListResponse {
        let items = self.store.search(text).await;
        ListResponse {
            success: true,
            message: format!("{} items matching '{}'", items.len(), text.trim()),
            count: items.len(),
            items,
            filters: None,
            query: Some(text.to_string()),
        }
    }

    /// Fetch a single item
    pub async fn get(&self, item_id: &str) -> ActionResponse {
        match self.store.get(item_id).await {
            Ok(item) => ActionResponse::ok(format!("Found '{}'", item.item), item),
            Err(_) => ActionResponse::failure(NOT_FOUND_MESSAGE),
        }
    }

    // ===== Updating =====

    /// Mark an item as bought, by id or by a unique name match among
    /// needed items. The id wins when both are given.
    pub async fn mark_bought(
        &self,
        item_id: Option<&str>,
        item_name: Option<&str>,
    ) -> Result<ActionResponse> {
        let item_id = item_id.map(str::trim).filter(|id| !id.is_empty());
        let item_name = item_name.map(str::trim).filter(|name| !name.is_empty());

        let result = match (item_id, item_name) {
            (Some(id), _) => self.store.set_status(id, Status::Bought).await,
            (None, Some(name)) => self.store.mark_bought_by_name(name).await,
            (None, None) => return Ok(ActionResponse::failure(NOT_FOUND_MESSAGE)),
        };

        match result {
            Ok(item) => {
                tracing::info!("Item bought: {}", item.id);
                Ok(ActionResponse::ok(
                    format!("Nice grab! Marked '{}' as bought.", item.item),
                    item,
                ))
            }
            Err(e) => recover(e),
        }
    }

    /// Archive an item (off the active list, not deleted).
    /// Archiving an archived item succeeds.
    pub async fn archive(&self, item_id: &str) -> Result<ActionResponse> {
        match self.store.set_status(item_id, Status::Archived).await {
            Ok(item) => {
                tracing::info!("Item archived: {}", item.id);
                Ok(ActionResponse::ok(format!("Archived '{}'", item.item), item))
            }
            Err(e) => recover(e),
        }
    }

    /// Put a bought or archived item back on the list
    pub async fn restore(&self, item_id: &str) -> Result<ActionResponse> {
        match self.store.set_status(item_id, Status::Needed).await {
            Ok(item) => {
                tracing::info!("Item restored: {}", item.id);
                Ok(ActionResponse::ok(format!("Restored '{}'", item.item), item))
            }
            Err(e) => recover(e),
        }
    }

    /// Permanently delete an item
    pub async fn delete(&self, item_id: &str) -> Result<ActionResponse> {
        match self.store.delete(item_id).await {
            Ok(item) => {
                tracing::info!("Item deleted: {}", item.id);
                Ok(ActionResponse::ok_without_item(format!(
                    "Deleted '{}'",
                    item.item
                )))
            }
            Err(e) => recover(e),
        }
    }

    /// Change an item's details
    pub async fn update(&self, item_id: &str, update: ItemUpdate) -> Result<ActionResponse> {
        if update.is_empty() {
            return Ok(ActionResponse::failure("Nothing to update"));
        }

        match self.store.update(item_id, update).await {
            Ok(item) => {
                tracing::info!("Item updated: {}", item.id);
                Ok(ActionResponse::ok(format!("Updated '{}'", item.item), item))
            }
            Err(e) => recover(e),
        }
    }

    // ===== Stats & history =====

    /// Needed items per store
    pub async fn stores(&self) -> StoresResponse {
        let mut stores: BTreeMap<String, usize> = BTreeMap::new();
        for item in self.store.snapshot().await {
            if item.status != Status::Needed {
                continue;
            }
            if let Some(store) = item.store {
                *stores.entry(store).or_default() += 1;
            }
        }

        StoresResponse {
            success: true,
            message: format!("{} stores", stores.len()),
            total_stores: stores.len(),
            stores,
        }
    }

    /// Counts over the whole list, computed at call time
    pub async fn summary(&self) -> SummaryResponse {
        let items = self.store.snapshot().await;

        let mut total_needed = 0;
        let mut total_bought = 0;
        let mut urgent = 0;
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut stores: BTreeMap<String, usize> = BTreeMap::new();

        for item in &items {
            match item.status {
                Status::Needed => {
                    total_needed += 1;
                    if item.priority == Priority::Urgent {
                        urgent += 1;
                    }
                    *by_category
                        .entry(item.category.as_str().to_string())
                        .or_default() += 1;
                    if let Some(store) = &item.store {
                        *stores.entry(store.clone()).or_default() += 1;
                    }
                }
                Status::Bought => total_bought += 1,
                Status::Archived => {}
            }
        }

        SummaryResponse {
            success: true,
            message: format!("{} to grab, {} urgent", total_needed, urgent),
            total_needed,
            total_bought,
            urgent,
            by_category,
            stores,
        }
    }

    /// Items bought within the last `days` days, newest first
    pub async fn recent_purchases(&self, days: Option<i64>) -> RecentResponse {
        let days = days
            .unwrap_or(DEFAULT_RECENT_DAYS)
            .clamp(0, MAX_RECENT_DAYS);
        let items = self.store.recent_purchases(days, Utc::now()).await;

        RecentResponse {
            success: true,
            message: format!("{} items bought in the last {} days", items.len(), days),
            days,
            count: items.len(),
            items,
        }
    }

    // ===== Import =====

    /// Add the entries of a plain-text list that are not already on the
    /// list from the same source
    pub async fn import_list(&self, content: &str, source: &str) -> Result<ImportResponse> {
        let entries = import::parse_list(content)
            .into_iter()
            .map(|entry| NewItem {
                category: Some(import::categorize(&entry).as_str().to_string()),
                source: Some(source.to_string()),
                ..NewItem::named(entry)
            })
            .collect();

        let (added, skipped) = self.store.create_missing(entries).await?;

        tracing::info!(
            "Imported {} items from {} ({} already present)",
            added.len(),
            source,
            skipped
        );

        Ok(ImportResponse {
            success: true,
            message: format!("Sync complete! Added {} new items.", added.len()),
            added: added.len(),
            skipped,
            items: added,
        })
    }
}

/// Turn domain errors into failure responses; storage errors propagate
fn recover(err: AppError) -> Result<ActionResponse> {
    match err {
        e if e.is_persistence() => {
            tracing::error!("Storage failure: {}", e);
            Err(e)
        }
        AppError::ItemNotFound(what) => {
            tracing::debug!("No item for {:?}", what);
            Ok(ActionResponse::failure(NOT_FOUND_MESSAGE))
        }
        AppError::AmbiguousItem { query, matches } => Ok(ActionResponse::ambiguous(
            format!(
                "Found {} items matching '{}'. Be more specific or use the ID.",
                matches.len(),
                query
            ),
            matches,
        )),
        other => Ok(ActionResponse::failure(other.to_string())),
    }
}

fn clean(value: Option<&str>) -> Option<String> {
    normalize::clean_text(value)
}
