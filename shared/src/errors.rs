//! Shared error types for the shift scheduling system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Serialization failed: {message}")]
    SerializationError { message: String },

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Invalid timestamp: {input}")]
    InvalidTimestamp { input: String },

    #[error("Unknown shift type label: {label}")]
    UnknownShiftType { label: String },

    #[error("Unknown shift status: {status}")]
    UnknownShiftStatus { status: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Form validation failures, reported inline before any network call is made
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Employee name is required")]
    MissingEmployeeName,

    #[error("Employee availability is required")]
    MissingAvailability,

    #[error("Work percentage is required")]
    MissingWorkPercentage,

    #[error("Work percentage must be between 0 and 100, got {value}")]
    WorkPercentageOutOfRange { value: i64 },

    #[error("Shift start time is required")]
    MissingShiftStart,

    #[error("Shift end time is required")]
    MissingShiftEnd,

    #[error("Shift location is required")]
    MissingLocation,

    #[error("Shift required skill is required")]
    MissingRequiredSkill,

    #[error("Shift end {end} must be after start {start}")]
    EndNotAfterStart { start: String, end: String },

    #[error("Select at least one employee and one shift before generating a schedule")]
    EmptySelection { employees: usize, shifts: usize },
}

impl ValidationError {
    /// Form field the error should be shown next to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingEmployeeName => "name",
            ValidationError::MissingAvailability => "availability",
            ValidationError::MissingWorkPercentage | ValidationError::WorkPercentageOutOfRange { .. } => {
                "work_percentage"
            }
            ValidationError::MissingShiftStart => "start",
            ValidationError::MissingShiftEnd | ValidationError::EndNotAfterStart { .. } => "end",
            ValidationError::MissingLocation => "location",
            ValidationError::MissingRequiredSkill => "required_skill",
            ValidationError::EmptySelection { .. } => "selection",
        }
    }
}
