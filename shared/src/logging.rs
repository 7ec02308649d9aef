//! Shared logging utilities for consistent tracing across the scheduler

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Crates whose events are shown at the requested level; HTTP internals stay at warn
const FILTER_TEMPLATE: &str = "scheduler={level},shared={level},reqwest=warn,hyper=warn";

/// Build the filter directive string for a base level
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    FILTER_TEMPLATE.replace("{level}", base_level)
}

/// Initialize the stdout subscriber. `RUST_LOG` wins over the given level when set.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(log_level)));

    // A second initialization (tests, embedding) keeps the first subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Initialize tracing at the default level
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for job-aware info logging
#[macro_export]
macro_rules! job_info {
    ($job_id:expr, $($arg:tt)*) => {
        tracing::info!(
            job = %$job_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for job-aware warning logging
#[macro_export]
macro_rules! job_warn {
    ($job_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            job = %$job_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for job-aware error logging
#[macro_export]
macro_rules! job_error {
    ($job_id:expr, $($arg:tt)*) => {
        tracing::error!(
            job = %$job_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for job-aware debug logging
#[macro_export]
macro_rules! job_debug {
    ($job_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            job = %$job_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

/// Contextual logging helper for error conditions
pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}

/// Contextual logging helper for progress updates
pub fn log_progress(action: &str, details: &str) {
    info!(timestamp = format_timestamp(), "📋 {}: {}", action, details);
}
