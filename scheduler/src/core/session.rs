//! One "Generate Schedule" run: job id, attempt counter, state, cancellation

use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use shared::JobId;

use crate::types::JobState;

#[derive(Debug)]
pub struct SchedulingSession {
    id: Uuid,
    job_id: Option<JobId>,
    attempts: u32,
    state: JobState,
    cancel: CancellationToken,
}

impl SchedulingSession {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id: None,
            attempts: 0,
            state: JobState::Pending,
            cancel,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Record the identifier returned by the solver for this run
    pub fn attach_job(&mut self, job_id: JobId) {
        self.job_id = Some(job_id);
    }

    pub fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn record_attempt(&mut self) -> u32 {
        self.attempts += 1;
        self.attempts
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Move to a new state. Terminal states are sticky.
    pub fn transition(&mut self, next: JobState) {
        if self.state.is_terminal() || self.state == next {
            return;
        }
        debug!(session = %self.id, "Session {} -> {}", self.state, next);
        self.state = next;
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
