//! Core domain types shared by every component of the scheduler

pub mod employee;
pub mod fields;
pub mod shift;
pub mod shift_type;

pub use employee::{Availability, Employee, EmployeeDraft, EmployeePatch, EmployeeRecord, NewEmployee};
pub use shift::{NewShift, Shift, ShiftDraft, ShiftStatus};
pub use shift_type::ShiftType;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier the solver hands back for one job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Wrap a raw identifier, rejecting blank input
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Employee role row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRole {
    #[serde(rename = "EmployeeRoleId", deserialize_with = "fields::flexible_id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
