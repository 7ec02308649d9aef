//! Scheduler configuration
//!
//! Defaults, overridden by environment variables (a `.env` file is honoured),
//! overridden again by command-line flags in the binary.

use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{SchedulerError, SchedulerResult};

pub const DEFAULT_SOLVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_STORE_URL: &str = "http://localhost:3000/rest/v1";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 30;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EMPLOYEE_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_CACHE_PATH: &str = ".scheduler-cache.json";

/// Poll-loop timing: fixed delay between checks and a hard attempt cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub solver_base_url: Url,
    pub store_base_url: Url,
    pub store_api_key: Option<String>,
    pub poll: PollSettings,
    pub request_timeout: Duration,
    pub employee_cache_ttl: Duration,
    pub cache_path: PathBuf,
}

impl SchedulerConfig {
    /// Built-in defaults, before any environment or flag overrides
    pub fn defaults() -> SchedulerResult<Self> {
        Ok(Self {
            solver_base_url: parse_base_url("solver_base_url", DEFAULT_SOLVER_URL)?,
            store_base_url: parse_base_url("store_base_url", DEFAULT_STORE_URL)?,
            store_api_key: None,
            poll: PollSettings::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            employee_cache_ttl: DEFAULT_EMPLOYEE_CACHE_TTL,
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
        })
    }

    /// Load from the process environment after reading `.env` if present
    pub fn from_env() -> SchedulerResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> SchedulerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults()?;

        if let Some(raw) = lookup("SOLVER_BASE_URL") {
            config.solver_base_url = parse_base_url("SOLVER_BASE_URL", &raw)?;
        }
        if let Some(raw) = lookup("RECORD_STORE_URL") {
            config.store_base_url = parse_base_url("RECORD_STORE_URL", &raw)?;
        }
        if let Some(raw) = lookup("RECORD_STORE_API_KEY") {
            let key = raw.trim();
            config.store_api_key = (!key.is_empty()).then(|| key.to_string());
        }
        if let Some(raw) = lookup("POLL_INTERVAL_MS") {
            config.poll.interval = Duration::from_millis(parse_number("POLL_INTERVAL_MS", &raw)?);
        }
        if let Some(raw) = lookup("MAX_POLL_ATTEMPTS") {
            config.poll.max_attempts = parse_number("MAX_POLL_ATTEMPTS", &raw)?;
        }
        if let Some(raw) = lookup("REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("EMPLOYEE_CACHE_TTL_SECS") {
            config.employee_cache_ttl = Duration::from_secs(parse_number("EMPLOYEE_CACHE_TTL_SECS", &raw)?);
        }
        if let Some(raw) = lookup("EMPLOYEE_CACHE_PATH") {
            config.cache_path = PathBuf::from(raw.trim());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SchedulerResult<()> {
        if self.poll.max_attempts == 0 {
            return Err(SchedulerError::config("max_poll_attempts", "0"));
        }
        if self.poll.interval.is_zero() {
            return Err(SchedulerError::config("poll_interval", "0ms"));
        }
        if self.request_timeout.is_zero() {
            return Err(SchedulerError::config("request_timeout", "0s"));
        }
        if self.cache_path.as_os_str().is_empty() {
            return Err(SchedulerError::config("cache_path", ""));
        }
        Ok(())
    }
}

/// Parse and check an http(s) base URL
pub fn parse_base_url(field: &str, raw: &str) -> SchedulerResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|_| SchedulerError::config(field, raw))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(SchedulerError::config(field, raw)),
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> SchedulerResult<T> {
    raw.trim().parse().map_err(|_| SchedulerError::config(field, raw))
}

/// Join a base URL and a path without doubling or dropping slashes
pub fn endpoint(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
