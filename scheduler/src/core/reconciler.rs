//! Result reconciler: solver output -> calendar entries
//!
//! Each (shift, employee) pairing is matched against the shifts that were
//! submitted. Pairings that cannot be matched are dropped and reported as
//! [`ReconciliationWarning`]s; every valid pairing of one result is returned
//! together so the caller can merge all of them or none.

use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use tracing::warn;

use shared::{EmployeeRef, ScheduleSolution, Shift, SolverRecord};

use crate::types::{ReconciliationWarning, ScheduleItem};

#[derive(Debug, Clone)]
struct KnownShift {
    start: NaiveDateTime,
    end: NaiveDateTime,
    location: String,
}

/// Entries built from one solver result plus what had to be skipped
#[derive(Debug, Clone, Default)]
pub struct ReconcileReport {
    pub items: Vec<ScheduleItem>,
    pub warnings: Vec<ReconciliationWarning>,
}

/// Accumulates pairings per shift id in first-seen order
#[derive(Default)]
struct Pairings {
    order: Vec<String>,
    spans: HashMap<String, (NaiveDateTime, NaiveDateTime, Option<String>)>,
    employees: HashMap<String, Vec<String>>,
}

impl Pairings {
    fn add(&mut self, shift_id: &str, span: (NaiveDateTime, NaiveDateTime, Option<String>), employee: &str) {
        if !self.spans.contains_key(shift_id) {
            self.order.push(shift_id.to_string());
            self.spans.insert(shift_id.to_string(), span);
        }
        let names = self.employees.entry(shift_id.to_string()).or_default();
        if !names.iter().any(|name| name == employee) {
            names.push(employee.to_string());
        }
    }

    fn into_items(mut self) -> Vec<ScheduleItem> {
        self.order
            .into_iter()
            .filter_map(|id| {
                let (start, end, location) = self.spans.remove(&id)?;
                let employees = self.employees.remove(&id).unwrap_or_default();
                Some(ScheduleItem::from_span(id, start, end, employees, location))
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    known: HashMap<String, KnownShift>,
}

impl Reconciler {
    /// Index the shift records that were submitted with the job
    pub fn new(shifts: &[Shift]) -> Self {
        let known = shifts
            .iter()
            .map(|shift| {
                (
                    shift.id.clone(),
                    KnownShift {
                        start: shift.start,
                        end: shift.end,
                        location: shift.location.clone(),
                    },
                )
            })
            .collect();
        Self { known }
    }

    pub fn reconcile(&self, solution: &ScheduleSolution) -> ReconcileReport {
        let mut pairings = Pairings::default();
        let mut warnings = Vec::new();

        for record in &solution.shifts {
            let Some(solved) = parsed(record, &mut warnings) else {
                continue;
            };
            let Some(known) = self.known.get(&solved.id) else {
                warnings.push(ReconciliationWarning::UnknownShift {
                    shift_id: solved.id.clone(),
                });
                continue;
            };
            let Some(employee) = solved.employee.as_ref().and_then(EmployeeRef::name) else {
                warnings.push(ReconciliationWarning::MissingEmployee {
                    shift_id: solved.id.clone(),
                });
                continue;
            };

            // Prefer the solver's own times when it echoes both ends back
            let (start, end) = match (solved.start, solved.end) {
                (Some(start), Some(end)) => (start, end),
                _ => (known.start, known.end),
            };
            let location = solved
                .location
                .clone()
                .filter(|location| !location.trim().is_empty())
                .unwrap_or_else(|| known.location.clone());
            pairings.add(&solved.id, (start, end, Some(location)), employee);
        }

        let roster: HashSet<&str> = solution.employees.iter().filter_map(EmployeeRef::name).collect();
        for record in &solution.assignments {
            let Some(assignment) = parsed(record, &mut warnings) else {
                continue;
            };
            let Some(known) = self.known.get(&assignment.shift_id) else {
                warnings.push(ReconciliationWarning::UnknownShift {
                    shift_id: assignment.shift_id.clone(),
                });
                continue;
            };
            let Some(employee) = assignment.employee_name.as_deref() else {
                warnings.push(ReconciliationWarning::MissingEmployee {
                    shift_id: assignment.shift_id.clone(),
                });
                continue;
            };
            if !roster.is_empty() && !roster.contains(employee) {
                warnings.push(ReconciliationWarning::UnknownEmployee {
                    shift_id: assignment.shift_id.clone(),
                    employee: employee.to_string(),
                });
                continue;
            }
            pairings.add(
                &assignment.shift_id,
                (known.start, known.end, Some(known.location.clone())),
                employee,
            );
        }

        for warning in &warnings {
            warn!("⚠️ Skipping solver record: {}", warning);
        }

        ReconcileReport {
            items: pairings.into_items(),
            warnings,
        }
    }
}

fn parsed<'a, T>(record: &'a SolverRecord<T>, warnings: &mut Vec<ReconciliationWarning>) -> Option<&'a T> {
    match record {
        SolverRecord::Parsed(record) => Some(record),
        SolverRecord::Malformed { reason, .. } => {
            warnings.push(ReconciliationWarning::Malformed { reason: reason.clone() });
            None
        }
    }
}
