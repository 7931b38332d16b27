//! Integration tests for Grabbit
//!
//! These tests verify end-to-end functionality including:
//! - Item lifecycle through the facade
//! - Ordering and filtering rules
//! - Persistence across restarts, including files from older versions

use chrono::{Duration, Utc};
use grabbit::services::{Grabbit, ListQuery};
use grabbit::store::{ItemStore, NewItem, Priority, Status};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a facade over a fresh data directory
async fn create_test_grabbit() -> (Grabbit, PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("items.json");
    let store = ItemStore::open(&path).await.unwrap();

    (Grabbit::new(store), path, temp_dir)
}

async fn reopen(path: &Path) -> Grabbit {
    Grabbit::new(ItemStore::open(path).await.unwrap())
}

fn with_priority(name: &str, priority: &str) -> NewItem {
    NewItem {
        priority: Some(priority.to_string()),
        ..NewItem::named(name)
    }
}

#[tokio::test]
async fn test_item_lifecycle() {
    let (grabbit, path, _temp) = create_test_grabbit().await;

    // Add
    let added = grabbit
        .add(NewItem {
            store: Some("whole foods".to_string()),
            category: Some("grocery".to_string()),
            notes: Some("the organic kind".to_string()),
            ..NewItem::named("spinach")
        })
        .await
        .unwrap();
    assert!(added.success);
    let item = added.item.unwrap();
    assert_eq!(item.store.as_deref(), Some("Whole Foods"));

    // Find by search
    let found = grabbit.search("organic").await;
    assert_eq!(found.count, 1);

    // Buy it
    let bought = grabbit.mark_bought(None, Some("Spinach")).await.unwrap();
    assert!(bought.success);

    // No longer needed, but in the recent purchases
    assert_eq!(grabbit.list(ListQuery::default()).await.count, 0);
    let recent = grabbit.recent_purchases(None).await;
    assert_eq!(recent.days, 7);
    assert_eq!(recent.count, 1);

    // Archive, then delete
    assert!(grabbit.archive(&item.id).await.unwrap().success);
    assert_eq!(grabbit.recent_purchases(None).await.count, 0);
    assert!(grabbit.delete(&item.id).await.unwrap().success);

    // Gone from disk too
    let reopened = reopen(&path).await;
    let all = reopened
        .list(ListQuery {
            status: Some("all".to_string()),
            ..ListQuery::default()
        })
        .await;
    assert_eq!(all.count, 0);
}

#[tokio::test]
async fn test_priority_ordering() {
    let (grabbit, _path, _temp) = create_test_grabbit().await;

    for (name, priority) in [
        ("low item", "low"),
        ("first urgent", "urgent"),
        ("medium item", "medium"),
        ("second urgent", "urgent"),
    ] {
        grabbit.add(with_priority(name, priority)).await.unwrap();
    }

    let listed = grabbit.list(ListQuery::default()).await;
    let names: Vec<&str> = listed.items.iter().map(|i| i.item.as_str()).collect();

    assert_eq!(
        names,
        vec!["first urgent", "second urgent", "medium item", "low item"]
    );
    assert_eq!(listed.items[0].priority, Priority::Urgent);
}

#[tokio::test]
async fn test_ambiguous_mark_bought_changes_nothing() {
    let (grabbit, path, _temp) = create_test_grabbit().await;

    grabbit.add(NewItem::named("paper towels")).await.unwrap();
    grabbit.add(NewItem::named("bath towels")).await.unwrap();

    let before = std::fs::read_to_string(&path).unwrap();
    let response = grabbit.mark_bought(None, Some("towels")).await.unwrap();
    let after = std::fs::read_to_string(&path).unwrap();

    assert!(!response.success);
    assert_eq!(response.matches.unwrap().len(), 2);
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_recent_purchases_window() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("items.json");

    let now = Utc::now();
    let three_days = (now - Duration::days(3)).to_rfc3339();
    let eight_days = (now - Duration::days(8)).to_rfc3339();
    let content = format!(
        r#"[
          {{"id": "aaaa1111", "item": "old purchase", "status": "bought", "store": null,
            "category": "groceries", "for_person": "self", "notes": null, "priority": "medium",
            "url": null, "price": null, "added_at": "{eight}", "bought_at": "{eight}",
            "recurring": false, "source": "manual"}},
          {{"id": "bbbb2222", "item": "recent purchase", "status": "bought", "store": null,
            "category": "groceries", "for_person": "self", "notes": null, "priority": "medium",
            "url": null, "price": null, "added_at": "{three}", "bought_at": "{three}",
            "recurring": false, "source": "manual"}}
        ]"#,
        eight = eight_days,
        three = three_days
    );
    std::fs::write(&path, content).unwrap();

    let grabbit = reopen(&path).await;
    let recent = grabbit.recent_purchases(Some(7)).await;

    assert_eq!(recent.count, 1);
    assert_eq!(recent.items[0].id, "bbbb2222");

    let wider = grabbit.recent_purchases(Some(30)).await;
    let ids: Vec<&str> = wider.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["bbbb2222", "aaaa1111"]);
}

#[tokio::test]
async fn test_loads_files_from_older_versions() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("items.json");

    // Naive timestamps and a free-form category, as written by earlier tools
    std::fs::write(
        &path,
        r#"[{"id": "1a2b3c4d", "item": "kindle", "status": "needed", "store": "Amazon",
             "category": "books", "for_person": "Sowmya", "notes": "she mentioned it",
             "priority": "high", "url": null, "price": 99.0,
             "added_at": "2025-01-10T09:15:30.123456", "bought_at": null,
             "recurring": false, "source": "whatsapp"}]"#,
    )
    .unwrap();

    let grabbit = reopen(&path).await;
    let response = grabbit.for_person("sowmya").await;

    assert_eq!(response.count, 1);
    let item = &response.items[0];
    assert_eq!(item.category.as_str(), "other");
    assert_eq!(item.price, Some(99.0));
    assert_eq!(item.added_at.to_rfc3339(), "2025-01-10T09:15:30.123456+00:00");
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let (grabbit, path, _temp) = create_test_grabbit().await;

    grabbit
        .add(NewItem {
            store: Some("ikea".to_string()),
            for_person: Some("Riaan".to_string()),
            price: Some(24.99),
            recurring: true,
            url: Some("https://example.com/lamp".to_string()),
            ..with_priority("desk lamp", "high")
        })
        .await
        .unwrap();
    let bought = grabbit.add(NewItem::named("bin bags")).await.unwrap().item.unwrap();
    grabbit.mark_bought(Some(&bought.id), None).await.unwrap();

    let before = grabbit.store().snapshot().await;
    let after = reopen(&path).await.store().snapshot().await;

    assert_eq!(before, after);
    assert_eq!(after[1].status, Status::Bought);
    assert!(after[1].bought_at.is_some());
}

#[tokio::test]
async fn test_concurrent_adds_are_all_kept() {
    let (grabbit, path, _temp) = create_test_grabbit().await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let grabbit = grabbit.clone();
        handles.push(tokio::spawn(async move {
            grabbit
                .add(NewItem::named(format!("item {}", i)))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().success);
    }

    let reopened = reopen(&path).await;
    assert_eq!(reopened.list(ListQuery::default()).await.count, 20);
}

#[tokio::test]
async fn test_concurrent_mark_bought_by_name_buys_once() {
    let (grabbit, _path, _temp) = create_test_grabbit().await;
    grabbit.add(NewItem::named("oat milk")).await.unwrap();

    let first = {
        let grabbit = grabbit.clone();
        tokio::spawn(async move { grabbit.mark_bought(None, Some("milk")).await.unwrap() })
    };
    let second = {
        let grabbit = grabbit.clone();
        tokio::spawn(async move { grabbit.mark_bought(None, Some("milk")).await.unwrap() })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    let successes = results.iter().filter(|response| response.success).count();
    assert_eq!(successes, 1);
    assert_eq!(grabbit.recent_purchases(Some(1)).await.count, 1);
}

#[tokio::test]
async fn test_concurrent_imports_do_not_duplicate() {
    let (grabbit, path, _temp) = create_test_grabbit().await;
    let list = "grocery\n* Milk\n* Eggs\n* dish soap\n";

    let mut handles = Vec::new();
    for _ in 0..4 {
        let grabbit = grabbit.clone();
        handles.push(tokio::spawn(async move {
            grabbit.import_list(list, "google_keep").await.unwrap()
        }));
    }

    let mut added = 0;
    for handle in handles {
        added += handle.await.unwrap().added;
    }
    assert_eq!(added, 3);

    let reopened = reopen(&path).await;
    assert_eq!(reopened.list(ListQuery::default()).await.count, 3);
}

#[tokio::test]
async fn test_storage_failure_is_an_error_and_changes_nothing() {
    let (grabbit, path, _temp) = create_test_grabbit().await;
    let eggs = grabbit.add(NewItem::named("eggs")).await.unwrap().item.unwrap();
    let on_disk = std::fs::read(&path).unwrap();

    // A directory where the temp file goes makes every write fail
    std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

    assert!(grabbit.add(NewItem::named("bread")).await.is_err());
    assert!(grabbit.mark_bought(None, Some("eggs")).await.is_err());
    assert!(grabbit.mark_bought(Some(&eggs.id), None).await.is_err());
    assert!(grabbit.import_list("butter\n", "google_keep").await.is_err());

    let needed = grabbit.list(ListQuery::default()).await;
    assert_eq!(needed.count, 1);
    assert_eq!(needed.items[0].status, Status::Needed);
    assert_eq!(std::fs::read(&path).unwrap(), on_disk);
}
