//! Employee records: the store row shape, the normalized domain type and form drafts

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fields::{self, parse_list_text, parse_string_list};
use crate::errors::ValidationError;

/// Work percentage assumed when a row does not carry one
pub const DEFAULT_WORK_PERCENTAGE: u8 = 100;

/// Availability as captured by the employee form.
///
/// Rows have held weekday lists, free text and JSON-encoded arrays; the value is
/// preserved in whichever shape it arrived and is not interpreted further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Availability {
    List(Vec<String>),
    Text(String),
    #[default]
    Unspecified,
}

impl Availability {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Availability::Unspecified,
            Value::Array(_) => Self::from_list(parse_string_list(value)),
            Value::String(text) => Self::from_text(text),
            other => Availability::Text(other.to_string()),
        }
    }

    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Availability::Unspecified
        } else if trimmed.starts_with('[') || trimmed.starts_with('"') {
            Self::from_list(parse_list_text(trimmed))
        } else {
            Availability::Text(trimmed.to_string())
        }
    }

    fn from_list(items: Vec<String>) -> Self {
        if items.is_empty() {
            Availability::Unspecified
        } else {
            Availability::List(items)
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, Availability::Unspecified)
    }

    /// Column value written back to the store (lists as JSON-encoded text)
    pub fn to_column(&self) -> Value {
        match self {
            Availability::List(items) => Value::String(encode_list(items)),
            Availability::Text(text) => Value::String(text.clone()),
            Availability::Unspecified => Value::Null,
        }
    }
}

fn encode_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

/// Employee row as stored in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "EmployeeId", alias = "id", deserialize_with = "fields::flexible_id::deserialize")]
    pub employee_id: String,

    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,

    #[serde(rename = "work_percentages", alias = "workPercentage", default)]
    pub work_percentage: Option<f64>,

    #[serde(rename = "Availability", alias = "availability", default)]
    pub availability: Value,

    #[serde(
        rename = "employeeRoleId",
        default,
        deserialize_with = "fields::flexible_id::deserialize_option"
    )]
    pub role_id: Option<String>,

    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "Skills", alias = "skills", default)]
    pub skills: Value,

    #[serde(rename = "Preferences", alias = "preferences", default)]
    pub preferences: Value,

    #[serde(rename = "unavailableDates", default, skip_serializing_if = "Vec::is_empty")]
    pub unavailable_dates: Vec<NaiveDate>,

    #[serde(rename = "undesiredDates", default, skip_serializing_if = "Vec::is_empty")]
    pub undesired_dates: Vec<NaiveDate>,

    #[serde(rename = "desiredDates", default, skip_serializing_if = "Vec::is_empty")]
    pub desired_dates: Vec<NaiveDate>,
}

/// Normalized employee used everywhere past the data-access boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Fractional capacity, always within [0, 100]
    pub work_percentage: u8,
    pub skills: Vec<String>,
    pub shift_preferences: Vec<String>,
    pub availability: Availability,
    pub role_id: Option<String>,
    pub unavailable_dates: Vec<NaiveDate>,
    pub undesired_dates: Vec<NaiveDate>,
    pub desired_dates: Vec<NaiveDate>,
}

impl Employee {
    /// Single normalization point from a store row. Never fails: malformed list
    /// columns become empty lists and the work percentage is clamped.
    pub fn from_record(record: EmployeeRecord) -> Self {
        Self {
            id: record.employee_id,
            name: record.name.trim().to_string(),
            work_percentage: clamp_work_percentage(record.work_percentage),
            skills: parse_string_list(&record.skills),
            shift_preferences: parse_string_list(&record.preferences),
            availability: Availability::from_value(&record.availability),
            role_id: record.role_id,
            unavailable_dates: record.unavailable_dates,
            undesired_dates: record.undesired_dates,
            desired_dates: record.desired_dates,
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|own| own.eq_ignore_ascii_case(skill))
    }
}

impl From<EmployeeRecord> for Employee {
    fn from(record: EmployeeRecord) -> Self {
        Employee::from_record(record)
    }
}

fn clamp_work_percentage(value: Option<f64>) -> u8 {
    match value {
        Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => DEFAULT_WORK_PERCENTAGE,
    }
}

/// Employee form input before validation
#[derive(Debug, Clone, Default)]
pub struct EmployeeDraft {
    pub name: String,
    pub work_percentage: Option<i64>,
    pub availability: Availability,
    pub skills: Vec<String>,
    pub preferences: Vec<String>,
    pub role_id: Option<String>,
}

impl EmployeeDraft {
    /// Check required fields and produce the insert body
    pub fn validate(&self) -> Result<NewEmployee, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingEmployeeName);
        }
        if !self.availability.is_specified() {
            return Err(ValidationError::MissingAvailability);
        }
        let work_percentage = self.work_percentage.ok_or(ValidationError::MissingWorkPercentage)?;
        if !(0..=100).contains(&work_percentage) {
            return Err(ValidationError::WorkPercentageOutOfRange { value: work_percentage });
        }

        Ok(NewEmployee {
            name: name.to_string(),
            work_percentage: work_percentage as u8,
            availability: self.availability.to_column(),
            role_id: self.role_id.clone(),
            skills: encode_list(&clean(&self.skills)),
            preferences: encode_list(&clean(&self.preferences)),
        })
    }
}

fn clean(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validated insert body, list columns JSON-encoded the way the store keeps them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEmployee {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "work_percentages")]
    pub work_percentage: u8,
    #[serde(rename = "Availability")]
    pub availability: Value,
    #[serde(rename = "employeeRoleId", skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
    #[serde(rename = "Skills")]
    pub skills: String,
    #[serde(rename = "Preferences")]
    pub preferences: String,
}

/// Partial update body; absent fields are left untouched by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmployeePatch {
    #[serde(rename = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "work_percentages", skip_serializing_if = "Option::is_none")]
    pub work_percentage: Option<u8>,
    #[serde(rename = "Availability", skip_serializing_if = "Option::is_none")]
    pub availability: Option<Value>,
    #[serde(rename = "Skills", skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(rename = "Preferences", skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

impl EmployeePatch {
    pub fn work_percentage(mut self, value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) {
            return Err(ValidationError::WorkPercentageOutOfRange { value });
        }
        self.work_percentage = Some(value as u8);
        Ok(self)
    }

    pub fn skills(mut self, skills: &[String]) -> Self {
        self.skills = Some(encode_list(&clean(skills)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &EmployeePatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(skills: Value) -> EmployeeRecord {
        serde_json::from_value(json!({
            "EmployeeId": 7,
            "Name": "  Ada  ",
            "work_percentages": 80,
            "Availability": "[\"Monday\",\"Tuesday\"]",
            "employeeRoleId": null,
            "created_at": "2024-03-01T08:00:00+00:00",
            "Skills": skills,
            "Preferences": "Morning Shift, Long Shift"
        }))
        .unwrap()
    }

    #[test]
    fn test_normalize_store_row() {
        let employee = Employee::from(row(json!("[\"Forklift\"]")));

        assert_eq!(employee.id, "7");
        assert_eq!(employee.name, "Ada");
        assert_eq!(employee.work_percentage, 80);
        assert_eq!(employee.skills, vec!["Forklift"]);
        assert_eq!(employee.shift_preferences, vec!["Morning Shift", "Long Shift"]);
        assert_eq!(
            employee.availability,
            Availability::List(vec!["Monday".to_string(), "Tuesday".to_string()])
        );
        assert!(employee.has_skill("forklift"));
    }

    #[test]
    fn test_malformed_skills_become_empty() {
        let employee = Employee::from(row(json!("[\"Forklift\", ")));
        assert!(employee.skills.is_empty());
    }

    #[test]
    fn test_work_percentage_is_clamped() {
        let mut record = row(Value::Null);
        record.work_percentage = Some(140.0);
        assert_eq!(Employee::from(record.clone()).work_percentage, 100);

        record.work_percentage = Some(-5.0);
        assert_eq!(Employee::from(record.clone()).work_percentage, 0);

        record.work_percentage = None;
        assert_eq!(Employee::from(record).work_percentage, DEFAULT_WORK_PERCENTAGE);
    }

    #[test]
    fn test_availability_shapes() {
        assert_eq!(Availability::from_text("weekends only"), Availability::Text("weekends only".to_string()));
        assert_eq!(Availability::from_text("   "), Availability::Unspecified);
        assert_eq!(Availability::from_text("[broken"), Availability::Unspecified);
        assert_eq!(
            Availability::from_value(&json!(["Friday"])),
            Availability::List(vec!["Friday".to_string()])
        );
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = EmployeeDraft {
            name: "Grace".to_string(),
            work_percentage: Some(60),
            availability: Availability::Text("weekdays".to_string()),
            skills: vec!["Cashier".to_string(), " ".to_string()],
            ..Default::default()
        };

        let new_employee = draft.validate().unwrap();
        assert_eq!(new_employee.skills, "[\"Cashier\"]");
        assert_eq!(new_employee.preferences, "[]");

        draft.work_percentage = Some(101);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::WorkPercentageOutOfRange { value: 101 })
        );

        draft.work_percentage = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingWorkPercentage));

        draft.availability = Availability::Unspecified;
        assert_eq!(draft.validate(), Err(ValidationError::MissingAvailability));

        draft.name = " ".to_string();
        assert_eq!(draft.validate(), Err(ValidationError::MissingEmployeeName));
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = EmployeePatch::default().work_percentage(50).unwrap();
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"work_percentages": 50}));
        assert!(EmployeePatch::default().is_empty());
        assert!(EmployeePatch::default().work_percentage(-1).is_err());
    }
}
