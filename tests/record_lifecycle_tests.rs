//! Record lifecycle tests: id assignment, timestamps, partial updates,
//! deletion semantics on the generic collection store.

use rentaldb::{Patch, Store, StoreError};
use serde_json::json;
use tempfile::TempDir;

fn fields(value: serde_json::Value) -> rentaldb::Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn open_store(dir: &TempDir) -> Store {
    Store::open(dir.path()).unwrap()
}

#[tokio::test]
async fn test_create_assigns_sequential_ids_from_one() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    for expected in 1..=5u64 {
        let record = items.create(fields(json!({"n": expected}))).await.unwrap();
        assert_eq!(record.id(), Some(expected));
    }

    let ids: Vec<_> = items.load().await.unwrap().iter().map(|r| r.id()).collect();
    assert_eq!(ids, (1..=5).map(Some).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_create_stamps_both_timestamps() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    let record = items.create(fields(json!({"n": 1}))).await.unwrap();
    let created = record.created_at().expect("created_at missing");
    let updated = record.updated_at().expect("updated_at missing");
    assert_eq!(created, updated);
    // ISO-8601 UTC, e.g. 2024-01-15T10:30:00.123Z
    assert!(created.ends_with('Z'), "not UTC: {created}");
    assert!(created.parse::<chrono::DateTime<chrono::Utc>>().is_ok());
}

#[tokio::test]
async fn test_partial_update_preserves_other_fields() {
    let dir = TempDir::new().unwrap();
    let vehicles = open_store(&dir).collection("vehicles");

    let record = vehicles
        .create(fields(
            json!({"make": "Toyota", "model": "Camry", "price_per_day": 45000}),
        ))
        .await
        .unwrap();
    let id = record.id().unwrap();

    let updated = vehicles
        .update(id, Patch::new().set("price_per_day", 50000))
        .await
        .unwrap();

    assert_eq!(updated.get("make"), Some(&json!("Toyota")));
    assert_eq!(updated.get("model"), Some(&json!("Camry")));
    assert_eq!(updated.get("price_per_day"), Some(&json!(50000)));
    assert_eq!(updated.created_at(), record.created_at());
}

#[tokio::test]
async fn test_update_refreshes_updated_at_only() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    let record = items.create(fields(json!({"n": 1}))).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let updated = items
        .update(record.id().unwrap(), Patch::new().set("n", 2))
        .await
        .unwrap();

    assert_eq!(updated.created_at(), record.created_at());
    assert!(updated.updated_at() >= record.updated_at());
}

#[tokio::test]
async fn test_patch_cannot_change_id_or_created_at() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    let record = items.create(fields(json!({"n": 1}))).await.unwrap();
    let id = record.id().unwrap();

    let updated = items
        .update(
            id,
            Patch::new()
                .set("id", 999)
                .set("created_at", "1970-01-01T00:00:00.000Z")
                .set("n", 2),
        )
        .await
        .unwrap();

    assert_eq!(updated.id(), Some(id));
    assert_eq!(updated.created_at(), record.created_at());
    assert_eq!(updated.get("n"), Some(&json!(2)));
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    let err = items.update(42, Patch::new().set("n", 1)).await.unwrap_err();
    match err {
        StoreError::NotFound { collection, id } => {
            assert_eq!(collection, "items");
            assert_eq!(id, 42);
        }
        other => panic!("expected NotFound, got {other}"),
    }
}

#[tokio::test]
async fn test_find_absent_is_none_not_an_error() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");
    assert!(items.find(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_is_final() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    let record = items.create(fields(json!({"n": 1}))).await.unwrap();
    let id = record.id().unwrap();

    let removed = items.delete(id).await.unwrap();
    assert_eq!(removed.id(), Some(id));

    assert!(items.find(id).await.unwrap().is_none());
    assert!(
        items
            .update(id, Patch::new().set("n", 2))
            .await
            .unwrap_err()
            .is_not_found()
    );
    assert!(items.delete(id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_ids_of_deleted_middle_records_are_not_reused() {
    let dir = TempDir::new().unwrap();
    let items = open_store(&dir).collection("items");

    for n in 1..=3 {
        items.create(fields(json!({"n": n}))).await.unwrap();
    }
    items.delete(2).await.unwrap();

    let record = items.create(fields(json!({"n": 4}))).await.unwrap();
    assert_eq!(record.id(), Some(4));
}
