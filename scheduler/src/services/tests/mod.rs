//! Service-specific tests
//!
//! HTTP clients are exercised against wiremock servers; the file cache against
//! temporary directories.

mod employee_cache;
mod record_store;

// Common test utilities for services
pub mod common {
    use std::time::Duration;
    use url::Url;

    use crate::config::SchedulerConfig;

    /// Config pointing both HTTP clients at a mock server
    pub fn config_for(server_uri: &str) -> SchedulerConfig {
        let base = Url::parse(server_uri).expect("mock server URI");
        SchedulerConfig {
            solver_base_url: base.clone(),
            store_base_url: base,
            store_api_key: Some("test-key".to_string()),
            request_timeout: Duration::from_secs(5),
            ..SchedulerConfig::defaults().unwrap()
        }
    }
}
