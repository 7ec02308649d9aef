//! Service implementations
//!
//! Real implementations of the service traits: HTTP clients for the solver and
//! the record store, and the cache stores behind the employee directory.

pub mod employee_cache;
pub mod record_store;
pub mod solver_client;

#[cfg(test)]
mod tests;

pub use employee_cache::{EmployeeDirectory, FileCacheStore, MemoryCacheStore};
pub use record_store::RealRecordStore;
pub use solver_client::RealSolverClient;

use reqwest::StatusCode;
use std::time::Duration;

use crate::error::{SchedulerError, SchedulerResult};

pub(crate) fn build_http_client(timeout: Duration) -> SchedulerResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SchedulerError::config("http_client", e.to_string()))
}

/// Error text for a non-2xx response: a JSON `detail` (or `message`) field when
/// present, otherwise the raw body, otherwise the status line
pub(crate) fn describe_failure(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["detail", "message"] {
            if let Some(text) = map.get(field).and_then(serde_json::Value::as_str) {
                return text.to_string();
            }
        }
    }
    if body.is_empty() {
        status.to_string()
    } else {
        body.to_string()
    }
}
