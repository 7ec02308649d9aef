//! Core scheduling logic
//!
//! Payload building, reconciliation and calendar state are pure. The poller
//! only talks to the outside world through the `SolverClient` trait.

pub mod calendar;
pub mod payload;
pub mod poller;
pub mod reconciler;
pub mod session;

pub use calendar::CalendarState;
pub use payload::PayloadBuilder;
pub use poller::{PollStep, ResultPoller};
pub use reconciler::{ReconcileReport, Reconciler};
pub use session::SchedulingSession;
