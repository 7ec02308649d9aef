//! Scheduler-specific data types

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared::{JobId, ShiftType};

const TIME_FORMAT: &str = "%H:%M";

/// Calendar entry shown on the monthly schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    pub title: String,
    pub shift_type: ShiftType,
    pub employees: Vec<String>,
    pub date: NaiveDate,
    pub color: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ScheduleItem {
    /// Build an entry for a concrete time span; title and color follow the shift type
    pub fn from_span(
        id: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        employees: Vec<String>,
        location: Option<String>,
    ) -> Self {
        let shift_type = ShiftType::classify(start, end);
        Self {
            id: id.into(),
            title: shift_type.label().to_string(),
            shift_type,
            employees,
            date: start.date(),
            color: shift_type.color().to_string(),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            location,
        }
    }

    /// Manually added entry using the category's default hours
    pub fn manual(shift_type: ShiftType, date: NaiveDate, employees: Vec<String>) -> Self {
        let (start, end) = shift_type.default_hours();
        Self {
            id: format!("manual-{}", uuid::Uuid::new_v4()),
            title: shift_type.label().to_string(),
            shift_type,
            employees,
            date,
            color: shift_type.color().to_string(),
            start_time: start.format(TIME_FORMAT).to_string(),
            end_time: end.format(TIME_FORMAT).to_string(),
            location: None,
        }
    }

    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, TIME_FORMAT).ok()
    }

    pub fn has_employee(&self, name: &str) -> bool {
        self.employees.iter().any(|employee| employee == name)
    }
}

/// Which entries a calendar day view shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EmployeeFilter {
    #[default]
    All,
    Employee(String),
}

impl EmployeeFilter {
    pub fn matches(&self, item: &ScheduleItem) -> bool {
        match self {
            EmployeeFilter::All => true,
            EmployeeFilter::Employee(name) => item.has_employee(name),
        }
    }
}

/// Poll-chain state of one submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// Submitted, no status seen yet
    Pending,
    Active,
    Done,
    TimedOut,
    Failed,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Done | JobState::TimedOut | JobState::Failed | JobState::Cancelled
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Pending => "pending",
            JobState::Active => "active",
            JobState::Done => "done",
            JobState::TimedOut => "timed out",
            JobState::Failed => "failed",
            JobState::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// A solver record that could not become a calendar entry. Logged, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationWarning {
    UnknownShift { shift_id: String },
    MissingEmployee { shift_id: String },
    UnknownEmployee { shift_id: String, employee: String },
    /// A result record that did not parse
    Malformed { reason: String },
}

impl fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconciliationWarning::UnknownShift { shift_id } => {
                write!(f, "assignment references unknown shift {shift_id}")
            }
            ReconciliationWarning::MissingEmployee { shift_id } => {
                write!(f, "shift {shift_id} has no assigned employee")
            }
            ReconciliationWarning::UnknownEmployee { shift_id, employee } => {
                write!(f, "shift {shift_id} assigned to unknown employee {employee}")
            }
            ReconciliationWarning::Malformed { reason } => write!(f, "malformed solver record: {reason}"),
        }
    }
}

/// Counts from one merge into calendar state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub inserted: usize,
    pub replaced: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.replaced
    }

    pub fn absorb(&mut self, other: MergeSummary) {
        self.inserted += other.inserted;
        self.replaced += other.replaced;
    }
}

/// Outcome of one "generate schedule" run
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub job_id: JobId,
    pub attempts: u32,
    pub feasible: Option<bool>,
    pub merged: MergeSummary,
    pub skipped: Vec<ReconciliationWarning>,
}

impl SolveReport {
    /// Terminal result explicitly reported as violating hard constraints
    pub fn is_infeasible(&self) -> bool {
        self.feasible == Some(false)
    }
}
