//! Timestamp text encoding and time-delta helpers
//!
//! Timestamps are naive (no offset) and stored as fixed-width ISO-8601 text so
//! that lexical order in the event store equals chronological order.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

/// Storage format: `YYYY-MM-DDTHH:MM:SS.ffffff`
pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted input formats for user supplied anchor times, tried in order
const INPUT_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Render a timestamp as stored text
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(STORAGE_FORMAT).to_string()
}

/// Parse stored or user supplied timestamp text
///
/// RFC 3339 text with an offset is converted to UTC and stripped of the offset.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    for format in INPUT_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }
    DateTime::parse_from_rfc3339(text).ok().map(|ts| ts.with_timezone(&Utc).naive_utc())
}

/// Current UTC time truncated to whole seconds
pub fn now_truncated() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Minutes elapsed from `start` to `end`, with millisecond resolution
pub fn minutes_between(start: &NaiveDateTime, end: &NaiveDateTime) -> f64 {
    (*end - *start).num_milliseconds() as f64 / 60_000.0
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
