//! Submission date normalisation
//!
//! Dates reach us as whatever the client data store produced: ISO strings,
//! US-style dates, epoch milliseconds or serialized timestamp objects.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::record::PLACEHOLDER;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a loosely-typed date value into a calendar date
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
        }
        Value::Object(obj) => {
            let seconds = obj
                .get("seconds")
                .or_else(|| obj.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = obj
                .get("nanoseconds")
                .or_else(|| obj.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::from_timestamp(seconds, nanos.min(999_999_999) as u32).map(|dt| dt.date_naive())
        }
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Render a date as `Jan 5, 2024`, or the placeholder when absent or unparseable
pub fn format_date(value: Option<&Value>) -> String {
    value
        .and_then(parse_date)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
