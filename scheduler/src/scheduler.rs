//! Scheduler facade: the "Generate Schedule" flow
//!
//! Owns the calendar state and the cancellation token of the active session.
//! Starting a new run cancels the previous one, so at most one poll chain can
//! write to the calendar at a time.

use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use shared::{Employee, JobId, ScheduleSolution, Shift, ValidationError, job_error, job_info, job_warn};

use crate::config::PollSettings;
use crate::core::{CalendarState, PayloadBuilder, PollStep, Reconciler, ResultPoller, SchedulingSession};
use crate::error::{SchedulerError, SchedulerResult};
use crate::traits::SolverClient;
use crate::types::{MergeSummary, ReconciliationWarning, ScheduleItem, SolveReport};

pub struct Scheduler<C>
where
    C: SolverClient + ?Sized + 'static,
{
    client: Arc<C>,
    calendar: Arc<RwLock<CalendarState>>,
    poll: PollSettings,
    payload: PayloadBuilder,

    /// Session id and token of the run currently allowed to write
    active: Mutex<Option<(Uuid, CancellationToken)>>,

    /// Parent of every session token; cancelling it stops all runs
    shutdown: CancellationToken,
}

impl<C> Scheduler<C>
where
    C: SolverClient + ?Sized + 'static,
{
    pub fn new(client: Arc<C>, poll: PollSettings) -> Self {
        Self::with_calendar(client, poll, Arc::new(RwLock::new(CalendarState::new())))
    }

    /// Build around an existing calendar shared with other writers (manual edits)
    pub fn with_calendar(client: Arc<C>, poll: PollSettings, calendar: Arc<RwLock<CalendarState>>) -> Self {
        Self {
            client,
            calendar,
            poll,
            payload: PayloadBuilder::new(),
            active: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn calendar(&self) -> Arc<RwLock<CalendarState>> {
        self.calendar.clone()
    }

    pub fn poll_settings(&self) -> PollSettings {
        self.poll
    }

    /// Token whose cancellation stops every current and future run
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Cancel the in-flight run, if any
    pub async fn cancel_active(&self) -> bool {
        match self.active.lock().await.take() {
            Some((_, token)) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Submit the selection to the solver, poll until it finishes and merge the
    /// assignments into the calendar
    pub async fn generate_schedule(&self, employees: &[Employee], shifts: &[Shift]) -> SchedulerResult<SolveReport> {
        if employees.is_empty() || shifts.is_empty() {
            return Err(ValidationError::EmptySelection {
                employees: employees.len(),
                shifts: shifts.len(),
            }
            .into());
        }

        let request = self.payload.build(employees, shifts);
        let mut session = self.begin_session().await;

        let result = self.run_session(&mut session, &request, shifts).await;
        self.end_session(&session).await;
        result
    }

    async fn run_session(
        &self,
        session: &mut SchedulingSession,
        request: &shared::SolverRequest,
        shifts: &[Shift],
    ) -> SchedulerResult<SolveReport> {
        let job_id = self.client.submit(request).await?;
        session.attach_job(job_id.clone());
        job_info!(job_id, "🚀 Job submitted (session {})", session.id());

        if session.is_cancelled() {
            self.terminate(&job_id).await;
            return Err(SchedulerError::Cancelled { job_id });
        }

        let reconciler = Reconciler::new(shifts);
        let poller = ResultPoller::new(self.client.as_ref(), self.poll);
        let mut merged = MergeSummary::default();
        let mut skipped: Vec<ReconciliationWarning> = Vec::new();

        let solution = loop {
            match poller.step(session).await {
                Ok(PollStep::Pending) => {}
                Ok(PollStep::Snapshot(snapshot)) => {
                    let report = reconciler.reconcile(&snapshot);
                    match self.apply(session, &job_id, report.items).await {
                        Ok(summary) => {
                            job_info!(
                                job_id,
                                "📈 Applied intermediate solution ({} new, {} updated)",
                                summary.inserted,
                                summary.replaced
                            );
                            merged.absorb(summary);
                            skipped = report.warnings;
                        }
                        Err(e) => return Err(self.fail(&job_id, e).await),
                    }
                }
                Ok(PollStep::Done(solution)) => break solution,
                Err(e) => return Err(self.fail(&job_id, e).await),
            }
        };

        self.finish(session, &job_id, &reconciler, solution, merged, skipped).await
    }

    async fn finish(
        &self,
        session: &SchedulingSession,
        job_id: &JobId,
        reconciler: &Reconciler,
        solution: ScheduleSolution,
        mut merged: MergeSummary,
        mut skipped: Vec<ReconciliationWarning>,
    ) -> SchedulerResult<SolveReport> {
        let feasible = solution.feasible();

        if feasible == Some(false) {
            job_warn!(job_id, "⚠️ Solver finished without a feasible schedule; calendar left unchanged");
        } else {
            let report = reconciler.reconcile(&solution);
            let summary = match self.apply(session, job_id, report.items).await {
                Ok(summary) => summary,
                Err(e) => return Err(self.fail(job_id, e).await),
            };
            merged.absorb(summary);
            skipped = report.warnings;
            job_info!(
                job_id,
                "🗓️ Schedule applied: {} new, {} updated, {} skipped",
                summary.inserted,
                summary.replaced,
                skipped.len()
            );
        }

        Ok(SolveReport {
            job_id: job_id.clone(),
            attempts: session.attempts(),
            feasible,
            merged,
            skipped,
        })
    }

    /// Merge under the calendar write lock; a cancelled session never writes
    async fn apply(
        &self,
        session: &SchedulingSession,
        job_id: &JobId,
        items: Vec<ScheduleItem>,
    ) -> SchedulerResult<MergeSummary> {
        let mut calendar = self.calendar.write().await;
        if session.is_cancelled() {
            return Err(SchedulerError::Cancelled { job_id: job_id.clone() });
        }
        Ok(calendar.merge(items))
    }

    async fn fail(&self, job_id: &JobId, error: SchedulerError) -> SchedulerError {
        match &error {
            SchedulerError::Cancelled { .. } => {
                job_info!(job_id, "🛑 Run cancelled, asking solver to stop");
                self.terminate(job_id).await;
            }
            SchedulerError::Timeout { attempts, .. } => {
                job_error!(job_id, "⏰ Gave up after {} status checks; the job may still be running", attempts);
            }
            other => {
                job_error!(job_id, "❌ {}", other);
            }
        }
        error
    }

    async fn terminate(&self, job_id: &JobId) {
        if let Err(e) = self.client.terminate(job_id).await {
            job_warn!(job_id, "⚠️ Could not terminate solver job: {}", e);
        }
    }

    async fn begin_session(&self) -> SchedulingSession {
        let token = self.shutdown.child_token();
        let session = SchedulingSession::new(token.clone());

        let mut active = self.active.lock().await;
        if let Some((previous, previous_token)) = active.replace((session.id(), token)) {
            tracing::info!(session = %previous, "🔁 Cancelling previous run in favour of session {}", session.id());
            previous_token.cancel();
        }
        session
    }

    async fn end_session(&self, session: &SchedulingSession) {
        let mut active = self.active.lock().await;
        if matches!(active.as_ref(), Some((id, _)) if *id == session.id()) {
            *active = None;
        }
    }
}
