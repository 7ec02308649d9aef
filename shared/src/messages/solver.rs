//! Wire messages exchanged with the external solver service
//!
//! Request: `POST /schedules` with `{employees, shifts}`; the response body is the
//! job id as plain text. Status: `GET /schedules/{jobId}` returns a
//! [`ScheduleSolution`]. Both the current shape (`shifts[].employee`) and the
//! legacy shape (`assignments[]` + `employees[]`) are accepted.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::types::fields;

/// Body of a job submission
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRequest {
    pub employees: Vec<SolverEmployee>,
    pub shifts: Vec<SolverShift>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverEmployee {
    pub name: String,
    pub skills: Vec<String>,
    pub unavailable_dates: Vec<NaiveDate>,
    pub undesired_dates: Vec<NaiveDate>,
    pub desired_dates: Vec<NaiveDate>,
    pub shift_preferences: Vec<String>,
    pub work_percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverShift {
    pub id: String,
    #[serde(with = "fields::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "fields::timestamp")]
    pub end: NaiveDateTime,
    pub location: String,
    pub required_skill: String,
}

/// Solver-reported job status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SolverStatus {
    /// Accepted but not started
    SolvingScheduled,
    SolvingActive,
    NotSolving,
    Unknown(String),
}

impl SolverStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SolverStatus::NotSolving)
    }
}

impl Default for SolverStatus {
    fn default() -> Self {
        SolverStatus::Unknown(String::new())
    }
}

impl From<String> for SolverStatus {
    fn from(raw: String) -> Self {
        match raw.trim() {
            "SOLVING_SCHEDULED" => SolverStatus::SolvingScheduled,
            "SOLVING_ACTIVE" => SolverStatus::SolvingActive,
            "NOT_SOLVING" => SolverStatus::NotSolving,
            _ => SolverStatus::Unknown(raw),
        }
    }
}

impl From<SolverStatus> for String {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::SolvingScheduled => "SOLVING_SCHEDULED".to_string(),
            SolverStatus::SolvingActive => "SOLVING_ACTIVE".to_string(),
            SolverStatus::NotSolving => "NOT_SOLVING".to_string(),
            SolverStatus::Unknown(raw) => raw,
        }
    }
}

/// Score as either an object or a compact score string such as `0hard/-12soft`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Detailed(ScoreDetail),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    #[serde(default)]
    pub feasible: Option<bool>,
    #[serde(default)]
    pub hard_score: Option<i64>,
    #[serde(default)]
    pub soft_score: Option<i64>,
}

impl Score {
    /// `None` when the score does not say
    pub fn feasible(&self) -> Option<bool> {
        match self {
            Score::Detailed(detail) => detail.feasible.or(detail.hard_score.map(|hard| hard >= 0)),
            Score::Text(text) => feasible_from_text(text),
        }
    }
}

fn feasible_from_text(text: &str) -> Option<bool> {
    let mut hard = None;
    for part in text.split('/') {
        let part = part.trim();
        if let Some(init) = part.strip_suffix("init") {
            if init.parse::<i64>().ok()? < 0 {
                return Some(false);
            }
        } else if let Some(value) = part.strip_suffix("hard") {
            hard = value.parse::<i64>().ok();
        }
    }
    hard.map(|hard| hard >= 0)
}

/// Reference to an employee by name, as the solver echoes it back
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeRef {
    #[serde(default)]
    pub name: Option<String>,
}

impl EmployeeRef {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// Shift as returned by the solver, possibly carrying its assigned employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedShift {
    #[serde(deserialize_with = "fields::flexible_id::deserialize")]
    pub id: String,
    #[serde(default, with = "fields::option_timestamp")]
    pub start: Option<NaiveDateTime>,
    #[serde(default, with = "fields::option_timestamp")]
    pub end: Option<NaiveDateTime>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub required_skill: Option<String>,
    #[serde(default)]
    pub shift_type: Option<String>,
    #[serde(default)]
    pub employee: Option<EmployeeRef>,
}

/// Legacy response shape: a flat (shift, employee) pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyAssignment {
    #[serde(alias = "shift", deserialize_with = "shift_ref")]
    pub shift_id: String,
    #[serde(alias = "employee", default, deserialize_with = "employee_name_ref")]
    pub employee_name: Option<String>,
}

/// One element of a result array, kept even when it does not parse so a single
/// bad record cannot sink the whole status body
#[derive(Debug, Clone, PartialEq)]
pub enum SolverRecord<T> {
    Parsed(T),
    Malformed { reason: String, raw: Value },
}

impl<T> SolverRecord<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            SolverRecord::Parsed(record) => Some(record),
            SolverRecord::Malformed { .. } => None,
        }
    }
}

impl<T> From<T> for SolverRecord<T> {
    fn from(record: T) -> Self {
        SolverRecord::Parsed(record)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for SolverRecord<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(raw.clone()) {
            Ok(record) => SolverRecord::Parsed(record),
            Err(e) => SolverRecord::Malformed {
                reason: e.to_string(),
                raw,
            },
        })
    }
}

impl<T: Serialize> Serialize for SolverRecord<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SolverRecord::Parsed(record) => record.serialize(serializer),
            SolverRecord::Malformed { raw, .. } => raw.serialize(serializer),
        }
    }
}

/// Job status body
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSolution {
    #[serde(default)]
    pub solver_status: SolverStatus,
    #[serde(default)]
    pub score: Option<Score>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub shifts: Vec<SolverRecord<SolvedShift>>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub assignments: Vec<SolverRecord<LegacyAssignment>>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub employees: Vec<EmployeeRef>,
}

impl ScheduleSolution {
    pub fn feasible(&self) -> Option<bool> {
        self.score.as_ref().and_then(Score::feasible)
    }

    /// Number of (shift, employee) pairings in either response shape.
    /// Malformed records count too, so the reconciler gets to report them.
    pub fn assignment_count(&self) -> usize {
        let current = self
            .shifts
            .iter()
            .filter(|shift| match shift {
                SolverRecord::Parsed(shift) => shift.employee.as_ref().and_then(EmployeeRef::name).is_some(),
                SolverRecord::Malformed { .. } => true,
            })
            .count();
        current + self.assignments.len()
    }
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Shift reference as an id or an object carrying `id`
fn shift_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id.trim().to_string()),
        Value::Number(id) => Ok(id.to_string()),
        Value::Object(map) => match map.get("id") {
            Some(Value::String(id)) => Ok(id.trim().to_string()),
            Some(Value::Number(id)) => Ok(id.to_string()),
            _ => Err(serde::de::Error::custom("shift reference without id")),
        },
        other => Err(serde::de::Error::custom(format!("unsupported shift reference: {other}"))),
    }
}

/// Employee reference as a name or an object carrying `name`
fn employee_name_ref<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let name = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(name)) => Some(name),
        Some(Value::Object(map)) => map.get("name").and_then(Value::as_str).map(str::to_string),
        _ => None,
    };
    Ok(name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty()))
}
