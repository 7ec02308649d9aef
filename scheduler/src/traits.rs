//! Service trait definitions for dependency injection
//!
//! All network and storage I/O goes through these traits so the solve flow,
//! the poller and the employee directory can be exercised against mocks.

use async_trait::async_trait;

use crate::error::SchedulerResult;
use shared::{
    EmployeePatch, EmployeeRecord, EmployeeRole, JobId, NewEmployee, NewShift, ScheduleSolution, Shift, ShiftStatus,
    SolverRequest,
};

/// External solver service
#[mockall::automock]
#[async_trait]
pub trait SolverClient: Send + Sync {
    /// Submit a payload and return the job identifier. Not retried.
    async fn submit(&self, request: &SolverRequest) -> SchedulerResult<JobId>;

    /// Fetch the current status and (partial) solution of a job
    async fn fetch_status(&self, job_id: &JobId) -> SchedulerResult<ScheduleSolution>;

    /// Ask the solver to stop working on a job
    async fn terminate(&self, job_id: &JobId) -> SchedulerResult<()>;
}

/// Row store holding employee and shift records, keyed by surrogate id
#[mockall::automock]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list_employees(&self) -> SchedulerResult<Vec<EmployeeRecord>>;

    async fn get_employee(&self, id: &str) -> SchedulerResult<EmployeeRecord>;

    async fn create_employee(&self, employee: &NewEmployee) -> SchedulerResult<EmployeeRecord>;

    async fn update_employee(&self, id: &str, patch: &EmployeePatch) -> SchedulerResult<EmployeeRecord>;

    async fn delete_employee(&self, id: &str) -> SchedulerResult<()>;

    async fn list_roles(&self) -> SchedulerResult<Vec<EmployeeRole>>;

    async fn list_shifts(&self) -> SchedulerResult<Vec<Shift>>;

    async fn get_shift(&self, id: &str) -> SchedulerResult<Shift>;

    async fn create_shift(&self, shift: &NewShift) -> SchedulerResult<Shift>;

    async fn update_shift_status(&self, id: &str, status: ShiftStatus) -> SchedulerResult<Shift>;

    async fn delete_shift(&self, id: &str) -> SchedulerResult<()>;
}

/// Local key-value cache. Purely a request-reduction aid, not durable storage.
#[mockall::automock]
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> SchedulerResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> SchedulerResult<()>;

    async fn remove(&self, key: &str) -> SchedulerResult<()>;
}
