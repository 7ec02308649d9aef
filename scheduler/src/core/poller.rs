//! Result poller: drives one job's status checks to a terminal state
//!
//! Each [`ResultPoller::step`] waits the fixed interval (except before the first
//! check), fetches the job status once and reports what the caller should do
//! with it. Polls of one session are strictly sequential; the wait races the
//! session's cancellation token.

use shared::{JobId, ScheduleSolution, SolverStatus, job_debug, job_info, job_warn};

use crate::config::PollSettings;
use crate::core::session::SchedulingSession;
use crate::error::{SchedulerError, SchedulerResult};
use crate::traits::SolverClient;
use crate::types::JobState;

/// Outcome of a single status check
#[derive(Debug, Clone)]
pub enum PollStep {
    /// Still solving, nothing to show yet (or the snapshot was infeasible)
    Pending,
    /// Still solving with a feasible partial solution
    Snapshot(ScheduleSolution),
    /// Solver finished; final result
    Done(ScheduleSolution),
}

pub struct ResultPoller<'a, C: SolverClient + ?Sized> {
    client: &'a C,
    settings: PollSettings,
}

impl<'a, C: SolverClient + ?Sized> ResultPoller<'a, C> {
    pub fn new(client: &'a C, settings: PollSettings) -> Self {
        Self { client, settings }
    }

    /// Run until the job finishes, ignoring intermediate snapshots
    pub async fn run(&self, session: &mut SchedulingSession) -> SchedulerResult<ScheduleSolution> {
        loop {
            if let PollStep::Done(solution) = self.step(session).await? {
                return Ok(solution);
            }
        }
    }

    pub async fn step(&self, session: &mut SchedulingSession) -> SchedulerResult<PollStep> {
        let job_id = session
            .job_id()
            .cloned()
            .ok_or_else(|| SchedulerError::submission("session has no job id to poll"))?;

        if session.state().is_terminal() {
            return Err(SchedulerError::poll(&job_id, format!("session already {}", session.state())));
        }

        if session.attempts() >= self.settings.max_attempts {
            session.transition(JobState::TimedOut);
            return Err(SchedulerError::Timeout {
                job_id,
                attempts: session.attempts(),
            });
        }

        if session.attempts() > 0 {
            let cancel = session.cancel_token().clone();
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        if session.is_cancelled() {
            session.transition(JobState::Cancelled);
            job_info!(job_id, "🛑 Poll chain cancelled after {} attempts", session.attempts());
            return Err(SchedulerError::Cancelled { job_id });
        }

        let attempt = session.record_attempt();
        job_debug!(job_id, "🔄 Status check {}/{}", attempt, self.settings.max_attempts);

        let solution = match self.client.fetch_status(&job_id).await {
            Ok(solution) => solution,
            Err(e) => {
                session.transition(JobState::Failed);
                return Err(Self::as_poll_error(&job_id, e));
            }
        };

        Ok(self.interpret(&job_id, session, solution))
    }

    fn interpret(&self, job_id: &JobId, session: &mut SchedulingSession, solution: ScheduleSolution) -> PollStep {
        match &solution.solver_status {
            SolverStatus::NotSolving => {
                session.transition(JobState::Done);
                job_info!(
                    job_id,
                    "✅ Solver finished after {} checks ({} assignments)",
                    session.attempts(),
                    solution.assignment_count()
                );
                return PollStep::Done(solution);
            }
            SolverStatus::SolvingScheduled => {
                job_debug!(job_id, "Job queued on solver");
                return PollStep::Pending;
            }
            SolverStatus::SolvingActive => {}
            SolverStatus::Unknown(raw) => {
                job_warn!(job_id, "⚠️ Unrecognized solver status '{}', treating as active", raw);
            }
        }

        if session.state() != JobState::Active {
            job_info!(job_id, "⚙️ Solver is working on the job");
        }
        session.transition(JobState::Active);

        if solution.feasible() == Some(false) {
            job_warn!(job_id, "⚠️ Intermediate solution is infeasible, not applying it");
            return PollStep::Pending;
        }
        if solution.assignment_count() == 0 {
            return PollStep::Pending;
        }
        PollStep::Snapshot(solution)
    }

    fn as_poll_error(job_id: &JobId, error: SchedulerError) -> SchedulerError {
        match error {
            SchedulerError::Poll { .. } => error,
            other => SchedulerError::poll(job_id, other.to_string()),
        }
    }
}
