//! Solver client implementation over reqwest

use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use shared::{JobId, ScheduleSolution, SolverRequest};

use crate::config::{SchedulerConfig, endpoint};
use crate::error::{SchedulerError, SchedulerResult};
use crate::services::{build_http_client, describe_failure};
use crate::traits::SolverClient;

/// Talks to `<solver-base>/schedules`
#[derive(Clone)]
pub struct RealSolverClient {
    base_url: Url,
    client: reqwest::Client,
}

impl RealSolverClient {
    pub fn new(config: &SchedulerConfig) -> SchedulerResult<Self> {
        Ok(Self {
            base_url: config.solver_base_url.clone(),
            client: build_http_client(config.request_timeout)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn job_url(&self, job_id: &JobId) -> String {
        endpoint(&self.base_url, &format!("schedules/{}", job_id.as_str()))
    }
}

#[async_trait]
impl SolverClient for RealSolverClient {
    async fn submit(&self, request: &SolverRequest) -> SchedulerResult<JobId> {
        let url = endpoint(&self.base_url, "schedules");
        info!(
            "📤 Submitting {} employees and {} shifts to {}",
            request.employees.len(),
            request.shifts.len(),
            url
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SchedulerError::submission(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SchedulerError::submission(e.to_string()))?;

        if !status.is_success() {
            return Err(SchedulerError::submission(describe_failure(status, &body)));
        }

        let job_id = JobId::parse(&body).ok_or_else(|| SchedulerError::submission("solver returned an empty job id"))?;
        info!("🆔 Solver accepted job {}", job_id);
        Ok(job_id)
    }

    async fn fetch_status(&self, job_id: &JobId) -> SchedulerResult<ScheduleSolution> {
        let response = self
            .client
            .get(self.job_url(job_id))
            .send()
            .await
            .map_err(|e| SchedulerError::poll(job_id, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SchedulerError::poll(job_id, e.to_string()))?;

        if !status.is_success() {
            return Err(SchedulerError::poll(job_id, describe_failure(status, &body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| SchedulerError::poll(job_id, format!("unreadable status body: {e}")))
    }

    async fn terminate(&self, job_id: &JobId) -> SchedulerResult<()> {
        debug!("Terminating solver job {}", job_id);
        let response = self
            .client
            .delete(self.job_url(job_id))
            .send()
            .await
            .map_err(|e| SchedulerError::poll(job_id, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("⚠️ Solver refused to terminate job {}: {}", job_id, describe_failure(status, &body));
            return Err(SchedulerError::poll(job_id, describe_failure(status, &body)));
        }
        Ok(())
    }
}
