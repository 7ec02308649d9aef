//! Local employee cache
//!
//! The employee list is kept in a key-value [`CacheStore`] under fixed keys and
//! served from there while it is younger than the TTL. A cache that cannot be
//! read is a miss, never an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use shared::{Employee, EmployeeDraft, EmployeePatch, EmployeeRecord};

use crate::error::SchedulerResult;
use crate::traits::{CacheStore, RecordStore};

pub const CACHED_EMPLOYEES_KEY: &str = "cachedEmployees";
pub const LAST_FETCH_KEY: &str = "employeesLastFetch";

/// Cache entries persisted as one JSON object in a file
pub struct FileCacheStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SchedulerResult<HashMap<String, String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(HashMap::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &HashMap<String, String>) -> SchedulerResult<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(entries)?).await?;
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FileCacheStore {
    async fn get(&self, key: &str) -> SchedulerResult<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> SchedulerResult<()> {
        let _guard = self.lock.lock().await;
        // An unreadable file is overwritten rather than blocking every write
        let mut entries = self.load().await.unwrap_or_default();
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> SchedulerResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await.unwrap_or_default();
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }
}

/// In-process cache, used in tests and when no cache file is wanted
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> SchedulerResult<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> SchedulerResult<()> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> SchedulerResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// Employee access through the record store with a TTL cache in front
pub struct EmployeeDirectory<S: RecordStore + ?Sized, K: CacheStore + ?Sized> {
    store: Arc<S>,
    cache: Arc<K>,
    ttl: Duration,
}

impl<S: RecordStore + ?Sized, K: CacheStore + ?Sized> EmployeeDirectory<S, K> {
    pub fn new(store: Arc<S>, cache: Arc<K>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Normalized employees, from cache when fresh
    pub async fn employees(&self) -> SchedulerResult<Vec<Employee>> {
        Ok(self.records().await?.into_iter().map(Employee::from_record).collect())
    }

    pub async fn records(&self) -> SchedulerResult<Vec<EmployeeRecord>> {
        if let Some(records) = self.cached().await {
            debug!("Serving {} employees from cache", records.len());
            return Ok(records);
        }
        self.fetch().await
    }

    /// Bypass the cache and refetch
    pub async fn refresh(&self) -> SchedulerResult<Vec<Employee>> {
        Ok(self.fetch().await?.into_iter().map(Employee::from_record).collect())
    }

    pub async fn create(&self, draft: &EmployeeDraft) -> SchedulerResult<Employee> {
        let new_employee = draft.validate()?;
        let record = self.store.create_employee(&new_employee).await?;
        self.invalidate().await;
        Ok(Employee::from_record(record))
    }

    pub async fn update(&self, id: &str, patch: &EmployeePatch) -> SchedulerResult<Employee> {
        let record = self.store.update_employee(id, patch).await?;
        self.invalidate().await;
        Ok(Employee::from_record(record))
    }

    pub async fn delete(&self, id: &str) -> SchedulerResult<()> {
        self.store.delete_employee(id).await?;
        self.invalidate().await;
        Ok(())
    }

    /// Drop cached entries so the next read goes to the store
    pub async fn invalidate(&self) {
        for key in [CACHED_EMPLOYEES_KEY, LAST_FETCH_KEY] {
            if let Err(e) = self.cache.remove(key).await {
                warn!("⚠️ Could not clear cache entry {}: {}", key, e);
            }
        }
    }

    async fn fetch(&self) -> SchedulerResult<Vec<EmployeeRecord>> {
        let records = self.store.list_employees().await?;
        info!("👥 Loaded {} employees from record store", records.len());

        // Cache writes are best-effort
        match serde_json::to_string(&records) {
            Ok(encoded) => {
                if let Err(e) = self.cache.set(CACHED_EMPLOYEES_KEY, encoded).await {
                    warn!("⚠️ Could not cache employees: {}", e);
                } else if let Err(e) = self.cache.set(LAST_FETCH_KEY, Utc::now().to_rfc3339()).await {
                    warn!("⚠️ Could not record employee fetch time: {}", e);
                }
            }
            Err(e) => warn!("⚠️ Could not encode employees for cache: {}", e),
        }
        Ok(records)
    }

    async fn cached(&self) -> Option<Vec<EmployeeRecord>> {
        let fetched_at = self.cache.get(LAST_FETCH_KEY).await.ok().flatten()?;
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at).ok()?.with_timezone(&Utc);
        let age = Utc::now().signed_duration_since(fetched_at).to_std().ok()?;
        if age >= self.ttl {
            debug!("Employee cache is stale ({}s old)", age.as_secs());
            return None;
        }

        let encoded = self.cache.get(CACHED_EMPLOYEES_KEY).await.ok().flatten()?;
        match serde_json::from_str(&encoded) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!("⚠️ Ignoring unreadable employee cache: {}", e);
                None
            }
        }
    }
}
