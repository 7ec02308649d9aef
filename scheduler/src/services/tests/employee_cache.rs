//! Tests for the cache stores and the employee directory

use chrono::{Duration as ChronoDuration, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use shared::{EmployeeDraft, EmployeeRecord, ValidationError};

use crate::error::SchedulerError;
use crate::services::employee_cache::{
    CACHED_EMPLOYEES_KEY, EmployeeDirectory, FileCacheStore, LAST_FETCH_KEY, MemoryCacheStore,
};
use crate::traits::{CacheStore, MockRecordStore};

fn record(id: u32, name: &str) -> EmployeeRecord {
    serde_json::from_value(json!({
        "EmployeeId": id,
        "Name": name,
        "work_percentages": 100,
        "Availability": "weekdays",
        "Skills": "[\"Nurse\"]"
    }))
    .unwrap()
}

#[tokio::test]
async fn test_file_cache_round_trips_and_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("cache.json");

    let cache = FileCacheStore::new(&path);
    assert_eq!(cache.get("missing").await.unwrap(), None);

    cache.set("a", "1".to_string()).await.unwrap();
    cache.set("b", "2".to_string()).await.unwrap();
    cache.remove("a").await.unwrap();

    let reopened = FileCacheStore::new(&path);
    assert_eq!(reopened.get("a").await.unwrap(), None);
    assert_eq!(reopened.get("b").await.unwrap().as_deref(), Some("2"));
}

#[tokio::test]
async fn test_corrupt_cache_file_is_a_read_error_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cache.json");
    tokio::fs::write(&path, "{not json").await.unwrap();

    let cache = FileCacheStore::new(&path);
    assert!(cache.get("a").await.is_err());

    cache.set("a", "fresh".to_string()).await.unwrap();
    assert_eq!(cache.get("a").await.unwrap().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_directory_serves_fresh_cache_without_store_call() {
    let mut store = MockRecordStore::new();
    store
        .expect_list_employees()
        .times(1)
        .returning(|| Ok(vec![record(1, "Amy"), record(2, "Beth")]));

    let directory = EmployeeDirectory::new(
        Arc::new(store),
        Arc::new(MemoryCacheStore::new()),
        Duration::from_secs(300),
    );

    let first = directory.employees().await.unwrap();
    let second = directory.employees().await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second[1].name, "Beth");
    assert_eq!(second[0].skills, vec!["Nurse"]);
}

#[tokio::test]
async fn test_directory_refetches_stale_or_corrupt_cache() {
    let cache = Arc::new(MemoryCacheStore::new());
    let stale = (Utc::now() - ChronoDuration::minutes(10)).to_rfc3339();
    cache.set(LAST_FETCH_KEY, stale).await.unwrap();
    cache
        .set(CACHED_EMPLOYEES_KEY, serde_json::to_string(&vec![record(1, "Old")]).unwrap())
        .await
        .unwrap();

    let mut store = MockRecordStore::new();
    store
        .expect_list_employees()
        .times(2)
        .returning(|| Ok(vec![record(1, "New")]));

    let directory = EmployeeDirectory::new(Arc::new(store), cache.clone(), Duration::from_secs(300));
    assert_eq!(directory.employees().await.unwrap()[0].name, "New");

    cache.set(CACHED_EMPLOYEES_KEY, "garbage".to_string()).await.unwrap();
    assert_eq!(directory.employees().await.unwrap()[0].name, "New");
}

#[tokio::test]
async fn test_mutations_invalidate_cache() {
    let mut store = MockRecordStore::new();
    store
        .expect_list_employees()
        .times(2)
        .returning(|| Ok(vec![record(1, "Amy")]));
    store.expect_delete_employee().times(1).returning(|_| Ok(()));

    let cache = Arc::new(MemoryCacheStore::new());
    let directory = EmployeeDirectory::new(Arc::new(store), cache.clone(), Duration::from_secs(300));

    directory.employees().await.unwrap();
    directory.delete("1").await.unwrap();
    assert_eq!(cache.get(CACHED_EMPLOYEES_KEY).await.unwrap(), None);
    directory.employees().await.unwrap();
}

#[tokio::test]
async fn test_invalid_draft_never_reaches_store() {
    let mut store = MockRecordStore::new();
    store.expect_create_employee().never();

    let directory = EmployeeDirectory::new(
        Arc::new(store),
        Arc::new(MemoryCacheStore::new()),
        Duration::from_secs(300),
    );
    let draft = EmployeeDraft {
        name: "  ".to_string(),
        ..Default::default()
    };

    let result = directory.create(&draft).await;
    assert!(matches!(
        result,
        Err(SchedulerError::Validation(ValidationError::MissingEmployeeName))
    ));
}
