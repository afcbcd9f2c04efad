//! Submission normalizer: loose form/extension payloads in, canonical records out,
//! and the reverse mapping from stored rows back to editable form state.
//!
//! Forward rules shared by every entity:
//! - strings are trimmed;
//! - empty optional fields are omitted from the write, never stored as `""`;
//! - date-only inputs become UTC-midnight timestamps;
//! - `updated_at` is stamped on every write, `created_at` only on insert.
//!
//! Reverse rules: timestamps are cut to the widget precision (`YYYY-MM-DDTHH:mm`
//! or `YYYY-MM-DD`), missing values become `""`, missing flags become `false`.
//! A date-only field therefore loses its time of day on a reverse/forward cycle.

pub mod application;
pub mod event;
pub mod interview;
pub mod linking;
pub mod resume;
pub mod survey;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::store::Record;

pub use application::{ApplicationForm, ExtensionPayload, NewApplication};
pub use event::{EventForm, NewEvent};
pub use interview::{InterviewForm, NewInterview};
pub use linking::{apply_parent_link, clear_parent_link, is_read_only, ParentLinked};
pub use resume::{NewResume, ResumeForm};
pub use survey::{NewSurvey, SurveyForm};

const DATETIME_INPUT: &str = "%Y-%m-%dT%H:%M";
const DATE_INPUT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// A required field is empty. The message is shown to the user as-is.
    #[error("{0}")]
    Required(&'static str),

    #[error("Invalid {field}: '{value}'")]
    Invalid { field: &'static str, value: String },
}

impl NormalizeError {
    fn invalid(field: &'static str, value: &str) -> Self {
        NormalizeError::Invalid {
            field,
            value: value.to_string(),
        }
    }
}

/// A loosely typed payload that normalizes into one canonical record.
pub trait Submission: DeserializeOwned + Send {
    type Output: Serialize;

    fn normalize(self, user_id: Uuid, now: DateTime<Utc>) -> Result<Self::Output, NormalizeError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Insert,
    Update,
}

/// Stamps write timestamps onto an encoded record.
pub fn stamp(record: &mut Record, mode: WriteMode, now: DateTime<Utc>) {
    record.insert("updated_at".to_string(), json!(now));
    if mode == WriteMode::Insert {
        record.insert("created_at".to_string(), json!(now));
    }
}

// ────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────

/// Trimmed, or `None` when nothing is left.
pub fn clean(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn clean_opt(value: Option<&str>) -> Option<String> {
    value.and_then(clean)
}

pub fn require(value: &str, message: &'static str) -> Result<String, NormalizeError> {
    clean(value).ok_or(NormalizeError::Required(message))
}

/// Accepts `YYYY-MM-DDTHH:mm[:ss]`, RFC 3339, or a bare date (UTC midnight).
/// Zone-less inputs are read as UTC.
pub fn parse_form_datetime(
    field: &'static str,
    value: &str,
) -> Result<Option<DateTime<Utc>>, NormalizeError> {
    let Some(value) = clean(value) else {
        return Ok(None);
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Ok(Some(dt.with_timezone(&Utc)));
    }
    for format in [DATETIME_INPUT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&value, format) {
            return Ok(Some(naive.and_utc()));
        }
    }
    parse_form_date(field, &value)
}

/// A date-only input as a UTC-midnight timestamp. Full timestamps are kept.
pub fn parse_form_date(
    field: &'static str,
    value: &str,
) -> Result<Option<DateTime<Utc>>, NormalizeError> {
    let Some(value) = clean(value) else {
        return Ok(None);
    };
    if let Ok(date) = NaiveDate::parse_from_str(&value, DATE_INPUT) {
        return Ok(date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc()));
    }
    if value.contains('T') {
        return parse_form_datetime(field, &value);
    }
    Err(NormalizeError::invalid(field, &value))
}

pub fn parse_form_int(field: &'static str, value: &str) -> Result<Option<i32>, NormalizeError> {
    match clean(value) {
        None => Ok(None),
        Some(v) => v
            .parse::<i32>()
            .map(Some)
            .map_err(|_| NormalizeError::invalid(field, &v)),
    }
}

pub fn parse_form_uuid(field: &'static str, value: &str) -> Result<Option<Uuid>, NormalizeError> {
    match clean(value) {
        None => Ok(None),
        Some(v) => Uuid::parse_str(&v)
            .map(Some)
            .map_err(|_| NormalizeError::invalid(field, &v)),
    }
}

/// Rejects labels outside a fixed vocabulary.
pub fn one_of(
    field: &'static str,
    value: String,
    labels: &[&str],
) -> Result<String, NormalizeError> {
    if labels.contains(&value.as_str()) {
        Ok(value)
    } else {
        Err(NormalizeError::invalid(field, &value))
    }
}

/// `YYYY-MM-DDTHH:mm`, the datetime-picker precision.
pub fn datetime_input(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|v| v.format(DATETIME_INPUT).to_string())
        .unwrap_or_default()
}

/// `YYYY-MM-DD`, the date-picker precision.
pub fn date_input(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|v| v.format(DATE_INPUT).to_string())
        .unwrap_or_default()
}

pub fn text_input(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

pub fn number_input(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn hostname_of(raw: &str) -> Option<String> {
    url::Url::parse(raw.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

// ────────────────────────────────────────────
// Loose deserializers
// ────────────────────────────────────────────

/// Strings, numbers, and booleans all read as text; `null` reads as `""`.
pub fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Checkbox values: `true`, `"true"`, `"on"`, `"1"`, or `1`. Anything else is `false`.
pub fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::String(s) => matches!(s.trim(), "true" | "on" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

/// Simulates a store round trip: encode, assign an id, stamp, decode.
#[cfg(test)]
pub(crate) fn stored_row<T: Serialize, R: DeserializeOwned>(record: &T, now: DateTime<Utc>) -> R {
    let mut value = serde_json::to_value(record).unwrap();
    let map = value.as_object_mut().unwrap();
    map.insert("id".to_string(), json!(Uuid::new_v4()));
    stamp(map, WriteMode::Insert, now);
    serde_json::from_value(value).unwrap()
}
