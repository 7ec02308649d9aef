//! Test fixtures shared by the integration suites

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Value, json};

use shared::{Employee, EmployeeRecord, Shift, ShiftStatus};

pub struct TestFixtures;

impl TestFixtures {
    pub const JOB_ID: &'static str = "abc123";

    pub fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    pub fn at(hour: u32) -> NaiveDateTime {
        Self::day().and_hms_opt(hour, 0, 0).unwrap()
    }

    /// Two store rows in the shapes seen in the wild: JSON-encoded text and real arrays
    pub fn employee_records() -> Vec<EmployeeRecord> {
        serde_json::from_value(json!([
            {
                "EmployeeId": 1,
                "Name": "Amy Cole",
                "work_percentages": 100,
                "Availability": "[\"Monday\", \"Tuesday\"]",
                "Skills": "[\"Doctor\"]",
                "Preferences": "[\"Morning Shift\"]"
            },
            {
                "EmployeeId": 2,
                "Name": "Beth Diaz",
                "work_percentages": 50,
                "Availability": "weekends only",
                "Skills": ["Nurse"],
                "Preferences": null
            }
        ]))
        .unwrap()
    }

    pub fn employees() -> Vec<Employee> {
        Self::employee_records().into_iter().map(Employee::from_record).collect()
    }

    pub fn shift(id: &str, start: u32, end: u32, skill: &str) -> Shift {
        Shift {
            id: id.to_string(),
            start: Self::at(start),
            end: Self::at(end),
            required_skill: skill.to_string(),
            status: ShiftStatus::Scheduled,
            location: "Ambulatory care".to_string(),
        }
    }

    pub fn shifts() -> Vec<Shift> {
        vec![
            Self::shift("s1", 6, 11, "Doctor"),
            Self::shift("s2", 13, 17, "Nurse"),
        ]
    }

    pub fn active() -> Value {
        json!({"solverStatus": "SOLVING_ACTIVE", "score": null, "shifts": []})
    }

    /// Final result assigning only the first shift
    pub fn finished_with_one_assignment() -> Value {
        json!({
            "solverStatus": "NOT_SOLVING",
            "score": {"feasible": true, "hardScore": 0, "softScore": -2},
            "shifts": [
                {"id": "s1", "start": "2024-03-04T06:00:00", "end": "2024-03-04T11:00:00",
                 "location": "Ambulatory care", "requiredSkill": "Doctor", "shiftType": "MORNING",
                 "employee": {"name": "Amy Cole"}},
                {"id": "s2", "start": "2024-03-04T13:00:00", "end": "2024-03-04T17:00:00",
                 "location": "Ambulatory care", "requiredSkill": "Nurse", "shiftType": "AFTERNOON",
                 "employee": null}
            ]
        })
    }
}
