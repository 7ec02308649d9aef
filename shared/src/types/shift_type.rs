//! Shift-type classification derived from a shift's time span

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Shifts strictly longer than this are long shifts regardless of start hour
pub const LONG_SHIFT_HOURS: i64 = 8;

/// One of the eight calendar categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Evening,
    Night,
    MorningAfternoon,
    AfternoonEvening,
    EveningNight,
    LongShift,
}

/// Hour-of-day bucket: Morning [6,12), Afternoon [12,18), Evening [18,22), Night [22,6)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    fn of_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            18..=21 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    fn base_type(self) -> ShiftType {
        match self {
            DayPeriod::Morning => ShiftType::Morning,
            DayPeriod::Afternoon => ShiftType::Afternoon,
            DayPeriod::Evening => ShiftType::Evening,
            DayPeriod::Night => ShiftType::Night,
        }
    }
}

impl ShiftType {
    pub const ALL: [ShiftType; 8] = [
        ShiftType::Morning,
        ShiftType::Afternoon,
        ShiftType::Evening,
        ShiftType::Night,
        ShiftType::MorningAfternoon,
        ShiftType::AfternoonEvening,
        ShiftType::EveningNight,
        ShiftType::LongShift,
    ];

    /// Classify a shift from its start and end.
    ///
    /// The end is bucketed by its own hour, so a shift ending exactly on a
    /// boundary (06:00-12:00) crosses into the next bucket. Compound categories
    /// only apply between adjacent buckets (Morning -> Afternoon -> Evening ->
    /// Night). An end at or before the start classifies by start hour alone.
    pub fn classify(start: NaiveDateTime, end: NaiveDateTime) -> ShiftType {
        if end - start > Duration::hours(LONG_SHIFT_HOURS) {
            return ShiftType::LongShift;
        }

        let start_period = DayPeriod::of_hour(start.hour());
        if end <= start {
            return start_period.base_type();
        }

        let end_period = DayPeriod::of_hour(end.hour());

        match (start_period, end_period) {
            (DayPeriod::Morning, DayPeriod::Afternoon) => ShiftType::MorningAfternoon,
            (DayPeriod::Afternoon, DayPeriod::Evening) => ShiftType::AfternoonEvening,
            (DayPeriod::Evening, DayPeriod::Night) => ShiftType::EveningNight,
            _ => start_period.base_type(),
        }
    }

    /// Calendar label, e.g. "Morning-Afternoon Shift"
    pub fn label(&self) -> &'static str {
        match self {
            ShiftType::Morning => "Morning Shift",
            ShiftType::Afternoon => "Afternoon Shift",
            ShiftType::Evening => "Evening Shift",
            ShiftType::Night => "Night Shift",
            ShiftType::MorningAfternoon => "Morning-Afternoon Shift",
            ShiftType::AfternoonEvening => "Afternoon-Evening Shift",
            ShiftType::EveningNight => "Evening-Night Shift",
            ShiftType::LongShift => "Long Shift",
        }
    }

    /// Reverse of [`ShiftType::label`]
    pub fn from_label(label: &str) -> SharedResult<ShiftType> {
        let trimmed = label.trim();
        ShiftType::ALL
            .into_iter()
            .find(|shift_type| shift_type.label() == trimmed)
            .ok_or_else(|| SharedError::UnknownShiftType {
                label: label.to_string(),
            })
    }

    pub fn color(&self) -> &'static str {
        match self {
            ShiftType::Morning => "blue",
            ShiftType::Afternoon => "green",
            ShiftType::Evening => "purple",
            ShiftType::Night => "slate",
            ShiftType::MorningAfternoon => "teal",
            ShiftType::AfternoonEvening => "amber",
            ShiftType::EveningNight => "indigo",
            ShiftType::LongShift => "rose",
        }
    }

    /// Start and end wall-clock times offered when creating a shift of this type
    pub fn default_hours(&self) -> (NaiveTime, NaiveTime) {
        let (start, end) = match self {
            ShiftType::Morning => (6, 14),
            ShiftType::Afternoon => (12, 20),
            ShiftType::Evening => (16, 0),
            ShiftType::Night => (22, 6),
            ShiftType::MorningAfternoon => (8, 16),
            ShiftType::AfternoonEvening => (14, 22),
            ShiftType::EveningNight => (18, 2),
            ShiftType::LongShift => (8, 20),
        };
        (hour(start), hour(end))
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
