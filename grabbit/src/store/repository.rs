//! Item store
//!
//! Durable id -> item mapping backed by a single JSON file. The whole
//! record set lives in memory and is rewritten after every mutation.
//! One mutex serializes all load-mutate-persist cycles; a mutation is
//! committed in memory only after the file write succeeds.

use super::models::*;
use super::normalize;
use crate::config::{DEFAULT_FOR_PERSON, DEFAULT_SOURCE, ITEM_ID_LENGTH};
use crate::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// JSON-file item store
#[derive(Clone)]
pub struct ItemStore {
    path: PathBuf,
    items: Arc<Mutex<Vec<Item>>>,
}

impl ItemStore {
    /// Open the store at `path`, loading existing records if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let items = if fs::try_exists(&path).await? {
            let content = fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str::<Vec<Item>>(&content)?
            }
        } else {
            Vec::new()
        };

        tracing::info!("Loaded {} items from {:?}", items.len(), path);

        Ok(Self {
            path,
            items: Arc::new(Mutex::new(items)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a new item from loose input
    pub async fn create(&self, req: NewItem) -> Result<Item> {
        let mut guard = self.items.lock().await;

        let item = build_item(req, &guard)?;

        let mut next = guard.clone();
        next.push(item.clone());
        self.persist(&next).await?;
        *guard = next;

        tracing::debug!("Created item: {} ({})", item.id, item.item);
        Ok(item)
    }

    /// Create every entry whose name is not already on the list under the
    /// same source, in one write. Returns the created items and the number
    /// skipped.
    pub async fn create_missing(&self, entries: Vec<NewItem>) -> Result<(Vec<Item>, usize)> {
        let mut guard = self.items.lock().await;

        let mut next = guard.clone();
        let mut created = Vec::new();
        let mut skipped = 0;

        for req in entries {
            let item = build_item(req, &next)?;
            let duplicate = next.iter().any(|existing| {
                existing.source == item.source
                    && existing.item.to_lowercase() == item.item.to_lowercase()
            });
            if duplicate {
                skipped += 1;
                continue;
            }
            next.push(item.clone());
            created.push(item);
        }

        if !created.is_empty() {
            self.persist(&next).await?;
            *guard = next;
        }

        tracing::debug!("Created {} items, skipped {}", created.len(), skipped);
        Ok((created, skipped))
    }

    /// Get an item by ID
    pub async fn get(&self, id: &str) -> Result<Item> {
        let guard = self.items.lock().await;
        guard
            .iter()
            .find(|item| item.id == id)
            .cloned()
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))
    }

    /// Merge the given fields into an existing item
    pub async fn update(&self, id: &str, update: ItemUpdate) -> Result<Item> {
        if let Some(name) = &update.item {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("item name cannot be empty".to_string()));
            }
        }

        self.mutate(id, |item| {
            if let Some(name) = update.item {
                item.item = name.trim().to_string();
            }
            if let Some(status) = update.status {
                item.apply_status(status, Utc::now());
            }
            if let Some(store) = update.store {
                item.store = normalize::normalize_store_opt(Some(&store));
            }
            if let Some(category) = update.category {
                item.category = normalize::normalize_category(&category);
            }
            if let Some(person) = update.for_person {
                item.for_person = normalize::clean_text(Some(&person))
                    .unwrap_or_else(|| DEFAULT_FOR_PERSON.to_string());
            }
            if let Some(notes) = update.notes {
                item.notes = normalize::clean_text(Some(&notes));
            }
            if let Some(priority) = update.priority {
                item.priority = normalize::normalize_priority(&priority);
            }
            if let Some(url) = update.url {
                item.url = normalize::clean_text(Some(&url));
            }
            if let Some(price) = update.price {
                item.price = Some(price);
            }
            if let Some(recurring) = update.recurring {
                item.recurring = recurring;
            }
            if let Some(source) = update.source {
                item.source = normalize::clean_text(Some(&source))
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
            }
        })
        .await
    }

    /// Set an item's status. Moving to `Bought` stamps `bought_at`;
    /// any other status clears it.
    pub async fn set_status(&self, id: &str, status: Status) -> Result<Item> {
        self.mutate(id, |item| item.apply_status(status, Utc::now()))
            .await
    }

    /// Permanently remove an item
    pub async fn delete(&self, id: &str) -> Result<Item> {
        let mut guard = self.items.lock().await;

        let index = guard
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;

        let mut next = guard.clone();
        let removed = next.remove(index);
        self.persist(&next).await?;
        *guard = next;

        tracing::debug!("Deleted item: {}", id);
        Ok(removed)
    }

    /// Items matching every given filter, urgent first, oldest first
    /// within the same priority
    pub async fn query(&self, filter: &ItemFilter) -> Vec<Item> {
        let guard = self.items.lock().await;
        let mut items: Vec<Item> = guard
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        drop(guard);

        items.sort_by_key(|item| (Reverse(item.priority.rank()), item.added_at));
        items
    }

    /// Case-insensitive substring search over names and notes, any status
    pub async fn search(&self, text: &str) -> Vec<Item> {
        let needle = text.trim().to_lowercase();
        let guard = self.items.lock().await;
        guard
            .iter()
            .filter(|item| {
                item.item.to_lowercase().contains(&needle)
                    || item
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    }

    /// Resolve a loose name to exactly one needed item
    pub async fn find_needed_by_name(&self, name: &str) -> Result<Item> {
        let guard = self.items.lock().await;
        let index = resolve_needed(&guard, name)?;
        Ok(guard[index].clone())
    }

    /// Resolve a loose name to exactly one needed item and mark it bought,
    /// without releasing the lock in between
    pub async fn mark_bought_by_name(&self, name: &str) -> Result<Item> {
        let mut guard = self.items.lock().await;
        let index = resolve_needed(&guard, name)?;

        let mut next = guard.clone();
        next[index].apply_status(Status::Bought, Utc::now());
        let updated = next[index].clone();

        self.persist(&next).await?;
        *guard = next;

        tracing::debug!("Bought item by name: {}", updated.id);
        Ok(updated)
    }

    /// Bought items whose `bought_at` falls within `days` before `now`,
    /// most recent first
    pub async fn recent_purchases(&self, days: i64, now: DateTime<Utc>) -> Vec<Item> {
        let cutoff = now - Duration::days(days);
        let guard = self.items.lock().await;
        let mut items: Vec<Item> = guard
            .iter()
            .filter(|item| item.status == Status::Bought)
            .filter(|item| item.bought_at.is_some_and(|at| at >= cutoff))
            .cloned()
            .collect();
        drop(guard);

        items.sort_by_key(|item| Reverse(item.bought_at));
        items
    }

    /// Consistent copy of every record, in insertion order
    pub async fn snapshot(&self) -> Vec<Item> {
        self.items.lock().await.clone()
    }

    /// Apply `change` to one item, persist, and return the updated record
    async fn mutate<F>(&self, id: &str, change: F) -> Result<Item>
    where
        F: FnOnce(&mut Item),
    {
        let mut guard = self.items.lock().await;

        let index = guard
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))?;

        let mut next = guard.clone();
        change(&mut next[index]);
        let updated = next[index].clone();

        self.persist(&next).await?;
        *guard = next;

        tracing::debug!("Updated item: {}", id);
        Ok(updated)
    }

    /// Write the full record set, via a temp file and rename
    async fn persist(&self, items: &[Item]) -> Result<()> {
        let content = serde_json::to_string_pretty(items)?;

        let temp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Saved {} items to {:?}", items.len(), self.path);
        Ok(())
    }
}

/// Build a normalized record from loose input, with an id unused in `existing`
fn build_item(req: NewItem, existing: &[Item]) -> Result<Item> {
    let name = req.item.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("item name cannot be empty".to_string()));
    }

    Ok(Item {
        id: generate_id(existing),
        item: name.to_string(),
        status: Status::Needed,
        store: normalize::normalize_store_opt(req.store.as_deref()),
        category: req
            .category
            .as_deref()
            .map(normalize::normalize_category)
            .unwrap_or(Category::Other),
        for_person: normalize::clean_text(req.for_person.as_deref())
            .unwrap_or_else(|| DEFAULT_FOR_PERSON.to_string()),
        notes: normalize::clean_text(req.notes.as_deref()),
        priority: req
            .priority
            .as_deref()
            .map(normalize::normalize_priority)
            .unwrap_or(Priority::Medium),
        url: normalize::clean_text(req.url.as_deref()),
        price: req.price,
        added_at: Utc::now(),
        bought_at: None,
        recurring: req.recurring,
        source: normalize::clean_text(req.source.as_deref())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    })
}

/// Index of the single needed item whose name contains `name`
fn resolve_needed(items: &[Item], name: &str) -> Result<usize> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::ItemNotFound(name.to_string()));
    }

    let indices: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.status == Status::Needed)
        .filter(|(_, item)| item.item.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect();

    match indices.as_slice() {
        [] => Err(AppError::ItemNotFound(name.to_string())),
        [index] => Ok(*index),
        _ => Err(AppError::AmbiguousItem {
            query: name.to_string(),
            matches: indices.iter().map(|&i| items[i].clone()).collect(),
        }),
    }
}

/// Short id from a v4 UUID, regenerated on the rare collision
fn generate_id(existing: &[Item]) -> String {
    loop {
        let id: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(ITEM_ID_LENGTH)
            .collect();
        if !existing.iter().any(|item| item.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_store() -> (ItemStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = ItemStore::open(temp_dir.path().join("items.json"))
            .await
            .unwrap();
        (store, temp_dir)
    }

    fn named(name: &str, priority: &str) -> NewItem {
        NewItem {
            priority: Some(priority.to_string()),
            ..NewItem::named(name)
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_normalization() {
        let (store, _temp) = create_test_store().await;

        let item = store
            .create(NewItem {
                store: Some("tj".to_string()),
                category: Some("Food".to_string()),
                ..NewItem::named("  oat milk ")
            })
            .await
            .unwrap();

        assert_eq!(item.id.len(), ITEM_ID_LENGTH);
        assert_eq!(item.item, "oat milk");
        assert_eq!(item.status, Status::Needed);
        assert_eq!(item.store.as_deref(), Some("Trader Joe's"));
        assert_eq!(item.category, Category::Groceries);
        assert_eq!(item.for_person, "self");
        assert_eq!(item.priority, Priority::Medium);
        assert_eq!(item.source, "manual");
        assert!(item.bought_at.is_none());

        let fetched = store.get(&item.id).await.unwrap();
        assert_eq!(fetched, item);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_name() {
        let (store, _temp) = create_test_store().await;

        let result = store.create(NewItem::named("   ")).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_item() {
        let (store, _temp) = create_test_store().await;

        let result = store.get("nope").await;
        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_query_sorts_by_priority_then_age() {
        let (store, _temp) = create_test_store().await;

        let low = store.create(named("a", "low")).await.unwrap();
        let urgent1 = store.create(named("b", "urgent")).await.unwrap();
        let medium = store.create(named("c", "medium")).await.unwrap();
        let urgent2 = store.create(named("d", "urgent")).await.unwrap();

        let ids: Vec<String> = store
            .query(&ItemFilter::default())
            .await
            .into_iter()
            .map(|item| item.id)
            .collect();

        assert_eq!(ids, vec![urgent1.id, urgent2.id, medium.id, low.id]);
    }

    #[tokio::test]
    async fn test_query_filters() {
        let (store, _temp) = create_test_store().await;

        store
            .create(NewItem {
                store: Some("costco".to_string()),
                ..NewItem::named("diapers")
            })
            .await
            .unwrap();
        let gift = store
            .create(NewItem {
                for_person: Some("Sowmya".to_string()),
                category: Some("gift".to_string()),
                ..NewItem::named("Kindle")
            })
            .await
            .unwrap();

        let at_costco = store
            .query(&ItemFilter {
                store: Some("COSTCO".to_string()),
                ..ItemFilter::default()
            })
            .await;
        assert_eq!(at_costco.len(), 1);
        assert_eq!(at_costco[0].item, "diapers");

        let for_sowmya = store
            .query(&ItemFilter {
                for_person: Some("sowmya".to_string()),
                category: Some(Category::Gifts),
                ..ItemFilter::default()
            })
            .await;
        assert_eq!(for_sowmya.len(), 1);
        assert_eq!(for_sowmya[0].id, gift.id);

        store.set_status(&gift.id, Status::Archived).await.unwrap();
        let needed = store.query(&ItemFilter::default()).await;
        assert_eq!(needed.len(), 1);

        let all = store
            .query(&ItemFilter {
                status: StatusFilter::All,
                ..ItemFilter::default()
            })
            .await;
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_set_status_bought_stamps_time() {
        let (store, _temp) = create_test_store().await;
        let item = store.create(NewItem::named("eggs")).await.unwrap();

        let before = Utc::now();
        let bought = store.set_status(&item.id, Status::Bought).await.unwrap();
        let after = Utc::now();

        let bought_at = bought.bought_at.unwrap();
        assert!(bought_at >= before && bought_at <= after);

        let restored = store.set_status(&item.id, Status::Needed).await.unwrap();
        assert!(restored.bought_at.is_none());
    }

    #[tokio::test]
    async fn test_update_routes_status_through_set_status() {
        let (store, _temp) = create_test_store().await;
        let item = store.create(NewItem::named("bread")).await.unwrap();

        let updated = store
            .update(
                &item.id,
                ItemUpdate {
                    status: Some(Status::Bought),
                    store: Some("safeway".to_string()),
                    category: Some("nonsense".to_string()),
                    ..ItemUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, Status::Bought);
        assert!(updated.bought_at.is_some());
        assert_eq!(updated.store.as_deref(), Some("Safeway"));
        assert_eq!(updated.category, Category::Other);
        assert_eq!(updated.added_at, item.added_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let (store, _temp) = create_test_store().await;

        let result = store.update("missing", ItemUpdate::default()).await;
        assert!(matches!(result, Err(AppError::ItemNotFound(_))));

        let result = store.delete("missing").await;
        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_permanently() {
        let (store, _temp) = create_test_store().await;
        let item = store.create(NewItem::named("batteries")).await.unwrap();

        let removed = store.delete(&item.id).await.unwrap();
        assert_eq!(removed.id, item.id);
        assert!(store.get(&item.id).await.is_err());
        assert!(store.delete(&item.id).await.is_err());
    }

    #[tokio::test]
    async fn test_search_covers_notes_and_all_statuses() {
        let (store, _temp) = create_test_store().await;

        let milk = store.create(NewItem::named("Oat Milk")).await.unwrap();
        store
            .create(NewItem {
                notes: Some("for the milk frother".to_string()),
                ..NewItem::named("AA batteries")
            })
            .await
            .unwrap();
        store.create(NewItem::named("Bread")).await.unwrap();
        store.set_status(&milk.id, Status::Archived).await.unwrap();

        let results = store.search("MILK").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, milk.id);
    }

    #[tokio::test]
    async fn test_find_needed_by_name() {
        let (store, _temp) = create_test_store().await;

        store.create(NewItem::named("Oat milk")).await.unwrap();
        store.create(NewItem::named("Almond milk")).await.unwrap();
        let bread = store.create(NewItem::named("Bread")).await.unwrap();

        let found = store.find_needed_by_name("bread").await.unwrap();
        assert_eq!(found.id, bread.id);

        match store.find_needed_by_name("milk").await {
            Err(AppError::AmbiguousItem { matches, .. }) => assert_eq!(matches.len(), 2),
            other => panic!("expected ambiguous match, got {:?}", other),
        }

        store.set_status(&bread.id, Status::Bought).await.unwrap();
        assert!(matches!(
            store.find_needed_by_name("bread").await,
            Err(AppError::ItemNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_mark_bought_by_name_in_one_step() {
        let (store, _temp) = create_test_store().await;

        store.create(NewItem::named("Oat milk")).await.unwrap();
        let bread = store.create(NewItem::named("Bread")).await.unwrap();

        let bought = store.mark_bought_by_name("BREAD").await.unwrap();
        assert_eq!(bought.id, bread.id);
        assert_eq!(bought.status, Status::Bought);
        assert!(bought.bought_at.is_some());

        assert!(matches!(
            store.mark_bought_by_name("bread").await,
            Err(AppError::ItemNotFound(_))
        ));

        store.create(NewItem::named("Almond milk")).await.unwrap();
        assert!(matches!(
            store.mark_bought_by_name("milk").await,
            Err(AppError::AmbiguousItem { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_missing_skips_same_source_duplicates() {
        let (store, _temp) = create_test_store().await;

        store
            .create(NewItem {
                source: Some("google_keep".to_string()),
                ..NewItem::named("Milk")
            })
            .await
            .unwrap();
        store.create(NewItem::named("Eggs")).await.unwrap();

        let entries = ["milk", "eggs", "Butter", "butter"]
            .into_iter()
            .map(|name| NewItem {
                source: Some("google_keep".to_string()),
                ..NewItem::named(name)
            })
            .collect();

        let (created, skipped) = store.create_missing(entries).await.unwrap();
        let names: Vec<&str> = created.iter().map(|item| item.item.as_str()).collect();
        assert_eq!(names, vec!["eggs", "Butter"]);
        assert_eq!(skipped, 2);
        assert_eq!(store.snapshot().await.len(), 4);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_and_disk_unchanged() {
        let (store, _temp) = create_test_store().await;
        let item = store.create(NewItem::named("eggs")).await.unwrap();
        let on_disk = std::fs::read(store.path()).unwrap();

        std::fs::create_dir(store.path().with_extension("json.tmp")).unwrap();

        assert!(store.create(NewItem::named("bread")).await.is_err());
        assert!(store.set_status(&item.id, Status::Bought).await.is_err());
        assert!(store.mark_bought_by_name("eggs").await.is_err());
        assert!(store.delete(&item.id).await.is_err());

        assert_eq!(store.snapshot().await, vec![item]);
        assert_eq!(std::fs::read(store.path()).unwrap(), on_disk);
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("items.json");

        let created = {
            let store = ItemStore::open(&path).await.unwrap();
            let item = store
                .create(NewItem {
                    store: Some("rei".to_string()),
                    notes: Some("size medium".to_string()),
                    price: Some(89.5),
                    recurring: true,
                    url: Some("https://example.com/jacket".to_string()),
                    ..NewItem::named("rain jacket")
                })
                .await
                .unwrap();
            store.set_status(&item.id, Status::Bought).await.unwrap()
        };

        let reopened = ItemStore::open(&path).await.unwrap();
        let items = reopened.snapshot().await;
        assert_eq!(items, vec![created]);
    }
}
