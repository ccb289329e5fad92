//! Parsing sparse keyed series into time points.
//!
//! Data sources hand series over as JSON objects whose keys are timestamps
//! or dates. Keys that cannot be read as a point in time are dropped, never
//! reported as errors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

use crate::config::CalendarZone;
use crate::types::TimePoint;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Read a series key as an instant.
///
/// Accepted forms are epoch milliseconds, RFC 3339 timestamps, naive
/// date-times and plain `YYYY-MM-DD` dates. Naive forms are read on the wall
/// clock of `zone`; a plain date means midnight.
pub fn parse_key(key: &str, zone: CalendarZone) -> Option<DateTime<Utc>> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let digits = key.strip_prefix('-').unwrap_or(key);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return key
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(key) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(key, format) {
            return zone.from_local(naive);
        }
    }

    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .ok()
        .and_then(|date| zone.start_of_day(date))
}

/// Convert a keyed series into chronologically ordered time points.
pub fn points_from_keyed(series: &BTreeMap<String, f64>, zone: CalendarZone) -> Vec<TimePoint> {
    let mut points: Vec<TimePoint> = Vec::with_capacity(series.len());
    let mut dropped = 0usize;

    for (key, &value) in series {
        match parse_key(key, zone) {
            Some(timestamp) => points.push(TimePoint::new(timestamp, value)),
            None => {
                dropped += 1;
                tracing::debug!(key = %key, "dropping series entry with unparsable key");
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = points.len(), "parsed keyed series");
    }

    points.sort_by_key(|p| p.timestamp);
    points
}
