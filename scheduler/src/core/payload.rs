//! Payload builder: selected employees and shifts -> solver request
//!
//! Pure transformation, no I/O. Store rows are normalized leniently so one bad
//! column never fails the whole build.

use std::collections::HashSet;
use tracing::warn;

use shared::{Employee, Shift, SolverEmployee, SolverRequest, SolverShift};

#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadBuilder;

impl PayloadBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, employees: &[Employee], shifts: &[Shift]) -> SolverRequest {
        let mut seen = HashSet::new();
        for employee in employees {
            if !seen.insert(employee.name.as_str()) {
                warn!("⚠️ Duplicate employee name '{}' in solver payload", employee.name);
            }
        }

        SolverRequest {
            employees: employees.iter().map(Self::employee).collect(),
            shifts: shifts.iter().map(Self::shift).collect(),
        }
    }

    fn employee(employee: &Employee) -> SolverEmployee {
        SolverEmployee {
            name: employee.name.clone(),
            skills: employee.skills.clone(),
            unavailable_dates: employee.unavailable_dates.clone(),
            undesired_dates: employee.undesired_dates.clone(),
            desired_dates: employee.desired_dates.clone(),
            shift_preferences: employee.shift_preferences.clone(),
            work_percentage: employee.work_percentage,
        }
    }

    fn shift(shift: &Shift) -> SolverShift {
        SolverShift {
            id: shift.id.clone(),
            start: shift.start,
            end: shift.end,
            location: shift.location.clone(),
            required_skill: shift.required_skill.clone(),
        }
    }
}
