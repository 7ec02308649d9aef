//! Shift records and their lifecycle status

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::fields;
use super::shift_type::ShiftType;
use crate::errors::{SharedError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "Scheduled",
            ShiftStatus::InProgress => "In Progress",
            ShiftStatus::Completed => "Completed",
            ShiftStatus::Cancelled => "Cancelled",
        }
    }

    /// Badge style used by the shift list
    pub fn badge_style(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "bg-green-100 text-green-800",
            ShiftStatus::InProgress => "bg-blue-100 text-blue-800",
            ShiftStatus::Completed => "bg-gray-100 text-gray-800",
            ShiftStatus::Cancelled => "bg-red-100 text-red-800",
        }
    }
}

impl fmt::Display for ShiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShiftStatus {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "scheduled" => Ok(ShiftStatus::Scheduled),
            "in progress" | "inprogress" => Ok(ShiftStatus::InProgress),
            "completed" => Ok(ShiftStatus::Completed),
            "cancelled" | "canceled" => Ok(ShiftStatus::Cancelled),
            _ => Err(SharedError::UnknownShiftStatus { status: s.to_string() }),
        }
    }
}

/// Unknown or missing statuses fall back to `Scheduled`
fn lenient_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ShiftStatus, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|status| status.parse().ok()).unwrap_or_default())
}

/// Shift row. Column names follow the record store; camelCase aliases accept
/// the solver-side shape as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    #[serde(rename = "ShiftID", alias = "id", deserialize_with = "fields::flexible_id::deserialize")]
    pub id: String,

    #[serde(rename = "StartTime", alias = "start", with = "fields::timestamp")]
    pub start: NaiveDateTime,

    #[serde(rename = "EndTime", alias = "end", with = "fields::timestamp")]
    pub end: NaiveDateTime,

    #[serde(rename = "RequiredSkill", alias = "requiredSkill", default)]
    pub required_skill: String,

    #[serde(
        rename = "ShiftStatus",
        alias = "status",
        default,
        deserialize_with = "lenient_status"
    )]
    pub status: ShiftStatus,

    #[serde(rename = "location", default)]
    pub location: String,
}

impl Shift {
    pub fn shift_type(&self) -> ShiftType {
        ShiftType::classify(self.start, self.end)
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Calendar day the shift starts on
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }
}

/// Shift form input before validation
#[derive(Debug, Clone, Default)]
pub struct ShiftDraft {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub required_skill: String,
    pub status: ShiftStatus,
}

impl ShiftDraft {
    /// Prefill start and end from a category's default hours on `date`.
    /// Ends at or before the start roll over to the next day.
    pub fn for_type(shift_type: ShiftType, date: NaiveDate) -> Self {
        let (start_time, end_time) = shift_type.default_hours();
        let start = date.and_time(start_time);
        let mut end = date.and_time(end_time);
        if end <= start {
            end += Duration::days(1);
        }
        Self {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<NewShift, ValidationError> {
        let start = self.start.ok_or(ValidationError::MissingShiftStart)?;
        let end = self.end.ok_or(ValidationError::MissingShiftEnd)?;
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ValidationError::MissingLocation);
        }
        let required_skill = self.required_skill.trim();
        if required_skill.is_empty() {
            return Err(ValidationError::MissingRequiredSkill);
        }
        if end <= start {
            return Err(ValidationError::EndNotAfterStart {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(NewShift {
            start,
            end,
            status: self.status,
            required_skill: required_skill.to_string(),
            location: location.to_string(),
        })
    }
}

/// Validated insert body for a shift
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewShift {
    #[serde(rename = "StartTime", with = "fields::timestamp")]
    pub start: NaiveDateTime,
    #[serde(rename = "EndTime", with = "fields::timestamp")]
    pub end: NaiveDateTime,
    #[serde(rename = "ShiftStatus")]
    pub status: ShiftStatus,
    #[serde(rename = "RequiredSkill")]
    pub required_skill: String,
    pub location: String,
}
