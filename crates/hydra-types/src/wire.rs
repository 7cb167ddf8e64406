//! JSON encoding of persisted values.
//!
//! Records and goals are stored as JSON objects with camelCase fields:
//!
//! ```text
//! health-tracker-2026-10-18 -> {"waterIntake":3,"calorieIntake":450,
//!                               "timestamp":"2026-10-18T08:30:00Z","date":"2026-10-18T08:30:00Z"}
//! health-tracker-goals      -> {"waterGoal":8,"calorieGoal":2000}
//! ```
//!
//! Decoding is lenient at field level. A value that is not a JSON object is a
//! [`ParseError`]; inside an object, missing or malformed counts decode as 0,
//! missing or malformed goals fall back to their defaults one field at a
//! time, and an unparseable timestamp decodes as `None`.

use serde::Serialize;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{ParseError, ParseResult};
use crate::types::{DEFAULT_CALORIE_GOAL, DEFAULT_WATER_GOAL, DailyRecord, GoalSettings, Intake};

/// On-disk shape of a daily record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordPayload {
    water_intake: u32,
    calorie_intake: u32,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    date: OffsetDateTime,
}

/// A record as read back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredRecord {
    /// Logged totals, never negative.
    pub intake: Intake,
    /// Last write instant, `None` when missing or unparseable.
    pub timestamp: Option<OffsetDateTime>,
}

/// Serialize a record. `date` is written as the write instant.
pub fn encode_record(record: &DailyRecord) -> serde_json::Result<String> {
    serde_json::to_string(&RecordPayload {
        water_intake: record.intake.water_intake,
        calorie_intake: record.intake.calorie_intake,
        timestamp: record.timestamp,
        date: record.timestamp,
    })
}

/// Parse a stored record.
pub fn decode_record(raw: &str) -> ParseResult<StoredRecord> {
    let object = parse_object(raw)?;
    Ok(StoredRecord {
        intake: Intake::new(
            lenient_count(object.get("waterIntake")),
            lenient_count(object.get("calorieIntake")),
        ),
        timestamp: object.get("timestamp").and_then(parse_timestamp),
    })
}

/// Serialize goal settings.
pub fn encode_goals(goals: &GoalSettings) -> serde_json::Result<String> {
    serde_json::to_string(goals)
}

/// Parse stored goals, falling back to defaults field by field.
pub fn decode_goals(raw: &str) -> ParseResult<GoalSettings> {
    let object = parse_object(raw)?;
    Ok(GoalSettings {
        water_goal: positive_or(object.get("waterGoal"), DEFAULT_WATER_GOAL),
        calorie_goal: positive_or(object.get("calorieGoal"), DEFAULT_CALORIE_GOAL),
    })
}

fn parse_object(raw: &str) -> ParseResult<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ParseError::NotAnObject("null")),
        Value::Bool(_) => Err(ParseError::NotAnObject("a boolean")),
        Value::Number(_) => Err(ParseError::NotAnObject("a number")),
        Value::String(_) => Err(ParseError::NotAnObject("a string")),
        Value::Array(_) => Err(ParseError::NotAnObject("an array")),
    }
}

/// Decode a count: non-negative integers pass through (saturating at
/// `u32::MAX`), finite positive floats truncate, anything else is 0.
fn lenient_count(value: Option<&Value>) -> u32 {
    let Some(Value::Number(n)) = value else {
        return 0;
    };
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).unwrap_or(u32::MAX);
    }
    match n.as_f64() {
        // `as` saturates for out-of-range floats
        Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u32,
        _ => 0,
    }
}

fn positive_or(value: Option<&Value>, default: u32) -> u32 {
    match lenient_count(value) {
        0 => default,
        v => v,
    }
}

fn parse_timestamp(value: &Value) -> Option<OffsetDateTime> {
    value
        .as_str()
        .and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
}
