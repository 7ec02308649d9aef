//! Solve-and-poll client for an external workforce-scheduling solver
//!
//! Builds solver payloads from employee and shift records, submits them, polls
//! the job until it finishes and merges the assignments into calendar state.
//! Employee and shift records come from a row store, with a local TTL cache in
//! front of the employee list.

pub mod config;
pub mod core;
pub mod error;
pub mod scheduler;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{PollSettings, SchedulerConfig};
pub use core::{CalendarState, PayloadBuilder, PollStep, Reconciler, ResultPoller, SchedulingSession};
pub use error::{SchedulerError, SchedulerResult};
pub use scheduler::Scheduler;
pub use traits::{CacheStore, RecordStore, SolverClient};
pub use types::{EmployeeFilter, JobState, MergeSummary, ReconciliationWarning, ScheduleItem, SolveReport};
