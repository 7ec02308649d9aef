//! Helpers for standing up a mock solver and a scheduler pointed at it

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduler::services::RealSolverClient;
use scheduler::{PollSettings, Scheduler, SchedulerConfig};

pub struct TestHelpers;

impl TestHelpers {
    pub fn poll_settings(max_attempts: u32) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(10),
            max_attempts,
        }
    }

    pub fn scheduler_for(server: &MockServer, max_attempts: u32) -> Scheduler<RealSolverClient> {
        let config = SchedulerConfig {
            solver_base_url: Url::parse(&server.uri()).unwrap(),
            request_timeout: Duration::from_secs(5),
            poll: Self::poll_settings(max_attempts),
            ..SchedulerConfig::defaults().unwrap()
        };
        let client = RealSolverClient::new(&config).unwrap();
        Scheduler::new(Arc::new(client), config.poll)
    }

    pub async fn mount_submit(server: &MockServer, job_id: &str) {
        Mock::given(method("POST"))
            .and(path("/schedules"))
            .respond_with(ResponseTemplate::new(200).set_body_string(job_id))
            .expect(1)
            .mount(server)
            .await;
    }

    /// Serve `body` for the next `times` status checks. Mount order decides
    /// which mock answers first.
    pub async fn mount_status_times(server: &MockServer, job_id: &str, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/schedules/{job_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(times)
            .expect(times)
            .mount(server)
            .await;
    }

    pub async fn mount_status(server: &MockServer, job_id: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/schedules/{job_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}
