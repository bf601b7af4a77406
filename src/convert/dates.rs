//! Date parsing and formatting for date-typed columns
//!
//! Accepts the loose shapes people type into forms and spreadsheets
//! (`2024-1-5`, `2024/01/05 08:30`, `20240105`) and RFC 3339 / RFC 2822 timestamps.
//! Parsing returns a `Result`; the codec decides whether a failure drops the field or
//! keeps the raw value.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static LOOSE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})[-/]?(\d{1,2})?[-/]?(\d{0,2})[Tt\s]*(\d{1,2})?:?(\d{1,2})?:?(\d{1,2})?[.:]?(\d+)?$",
    )
    .expect("loose date pattern is valid")
});

/// Error produced when a value cannot be read as a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("Empty date value")]
    Empty,
    #[error("Unsupported date value type: {0}")]
    UnsupportedType(&'static str),
    #[error("Unrecognized date: {0}")]
    Unrecognized(String),
    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

/// Parse a record value as a local date-time.
///
/// Numbers are read through their decimal text, so `20240105` is a date while epoch
/// timestamps are not recognized.
pub fn parse_day(value: &Value) -> Result<NaiveDateTime, DateParseError> {
    match value {
        Value::String(s) => parse_day_str(s),
        Value::Number(n) => parse_day_str(&n.to_string()),
        Value::Null => Err(DateParseError::Empty),
        Value::Bool(_) => Err(DateParseError::UnsupportedType("bool")),
        Value::Array(_) => Err(DateParseError::UnsupportedType("list")),
        Value::Object(_) => Err(DateParseError::UnsupportedType("object")),
    }
}

/// Parse a date string.
pub fn parse_day_str(input: &str) -> Result<NaiveDateTime, DateParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DateParseError::Empty);
    }

    if let Some(caps) = LOOSE_DATE.captures(input) {
        let number = |i: usize, default: u32| -> u32 {
            caps.get(i)
                .map(|m| m.as_str())
                .filter(|s| !s.is_empty())
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        let year = number(1, 0) as i32;
        let millis: u32 = caps
            .get(7)
            .map(|m| {
                let digits: String = m.as_str().chars().take(3).collect();
                format!("{:0<3}", digits).parse().unwrap_or(0)
            })
            .unwrap_or(0);

        return NaiveDate::from_ymd_opt(year, number(2, 1), number(3, 1))
            .and_then(|date| date.and_hms_milli_opt(number(4, 0), number(5, 0), number(6, 0), millis))
            .ok_or_else(|| DateParseError::OutOfRange(input.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Ok(dt.naive_local());
    }

    Err(DateParseError::Unrecognized(input.to_string()))
}

pub fn format_date(dt: &NaiveDateTime) -> String {
    dt.format(DATE_FORMAT).to_string()
}

pub fn format_date_time(dt: &NaiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).to_string()
}
