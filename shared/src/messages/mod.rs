//! Messages exchanged with services outside this process

pub mod solver;

pub use solver::{
    EmployeeRef, LegacyAssignment, ScheduleSolution, Score, ScoreDetail, SolvedShift, SolverEmployee,
    SolverRecord, SolverRequest, SolverShift, SolverStatus,
};
