//! Lenient field normalization at the data-access boundary
//!
//! Store rows carry list-shaped columns (skills, preferences, availability) that
//! have been written as JSON arrays, JSON-encoded text and plain comma-separated
//! text over time. Everything here degrades to an empty value instead of failing.

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;

use crate::errors::{SharedError, SharedResult};

/// Wire format used when sending timestamps to the solver
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

/// Parse a list-shaped field. Accepts a JSON array, JSON-array-encoded text,
/// comma-separated text or null. Malformed JSON text yields an empty list.
pub fn parse_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(item_to_string).collect(),
        Value::String(text) => parse_list_text(text),
        other => item_to_string(other).into_iter().collect(),
    }
}

/// Text variant of [`parse_string_list`]
pub fn parse_list_text(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('[') || trimmed.starts_with('{') || trimmed.starts_with('"') {
        return match serde_json::from_str::<Value>(trimmed) {
            // Double-encoded: the column held a JSON string containing the list
            Ok(Value::String(inner)) => parse_list_text(&inner),
            Ok(Value::Array(items)) => items.iter().filter_map(item_to_string).collect(),
            Ok(_) | Err(_) => Vec::new(),
        };
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn item_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Parse a timestamp as wall-clock time. Offsets are honoured by keeping the
/// local time at that offset; offset-less values are taken as-is.
pub fn parse_timestamp(input: &str) -> SharedResult<NaiveDateTime> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(trimmed, format) {
            return Ok(parsed.naive_local());
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }

    Err(SharedError::InvalidTimestamp {
        input: input.to_string(),
    })
}

/// Serde adapter for `NaiveDateTime` fields that accepts every format
/// [`parse_timestamp`] understands and writes the solver wire format.
pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(super::WIRE_TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

/// Optional variant of [`timestamp`]
pub mod option_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => super::timestamp::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_timestamp(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Serde adapter for identifiers stored as either text or integers
pub mod flexible_id {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(text.trim().to_string()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(serde::de::Error::custom(format!("unsupported identifier: {other}"))),
        }
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(text)) if !text.trim().is_empty() => Ok(Some(text.trim().to_string())),
            Some(Value::Number(number)) => Ok(Some(number.to_string())),
            _ => Ok(None),
        }
    }
}
