//! Scheduler error types

use shared::{JobId, SharedError, ValidationError};
use thiserror::Error;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Schedule submission failed: {message}")]
    Submission { message: String },

    #[error("Polling job {job_id} failed: {message}")]
    Poll { job_id: JobId, message: String },

    #[error("Job {job_id} still solving after {attempts} status checks; it may still be running on the solver")]
    Timeout { job_id: JobId, attempts: u32 },

    #[error("Job {job_id} was cancelled before its result was applied")]
    Cancelled { job_id: JobId },

    #[error("Record store request failed: {message}")]
    Store { message: String },

    #[error("Record not found: {table} {id}")]
    NotFound { table: String, id: String },

    #[error("Invalid configuration: {field} = {value}")]
    Config { field: String, value: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn submission(message: impl Into<String>) -> Self {
        SchedulerError::Submission { message: message.into() }
    }

    pub fn poll(job_id: &JobId, message: impl Into<String>) -> Self {
        SchedulerError::Poll {
            job_id: job_id.clone(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        SchedulerError::Store { message: message.into() }
    }

    pub fn config(field: &str, value: impl Into<String>) -> Self {
        SchedulerError::Config {
            field: field.to_string(),
            value: value.into(),
        }
    }

    /// Whether the failure should be shown to the user as a notification.
    /// Cancellation is silent: the newer submission reports for itself.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SchedulerError::Cancelled { .. })
    }
}
