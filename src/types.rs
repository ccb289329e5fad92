//! # Common Types
//!
//! This module contains the types shared by the aggregation engine, the data
//! sources and the renderer: raw time points, date ranges, granularities and
//! the aggregated output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::CalendarZone;
use crate::error::ChartError;

/// A single observation of a series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// The instant the value was recorded at
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl TimePoint {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// An inclusive `[start, end]` pair of instants.
///
/// A range with `start > end` is accepted but aggregates to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Range from the start of `start` to the start of `end`, both read on the
    /// wall calendar of `zone`.
    pub fn from_dates(start: NaiveDate, end: NaiveDate, zone: CalendarZone) -> Result<Self, ChartError> {
        let resolve = |date: NaiveDate| {
            zone.start_of_day(date)
                .ok_or_else(|| ChartError::InvalidDate(date.to_string()))
        };
        Ok(Self::new(resolve(start)?, resolve(end)?))
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

/// Width of the calendar buckets a series is regrouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Quarter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Quarter => "quarter",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "week" | "weekly" => Ok(Granularity::Week),
            "month" | "monthly" => Ok(Granularity::Month),
            "quarter" | "quarterly" => Ok(Granularity::Quarter),
            _ => Err(ChartError::InvalidGranularity(s.to_string())),
        }
    }
}

/// One calendar period of an aggregated series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Display label of the period
    pub label: String,
    /// Sum of the sales values that fell in the period
    pub sales: f64,
    /// Sum of the secondary series values that fell in the period
    pub sum: f64,
}

/// Ordered buckets produced by one aggregation call.
///
/// Buckets are chronological and include empty periods with zero totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub granularity: Granularity,
    pub buckets: Vec<Bucket>,
}

impl AggregatedSeries {
    pub fn empty(granularity: Granularity) -> Self {
        Self {
            granularity,
            buckets: Vec::new(),
        }
    }

    pub fn with_capacity(granularity: Granularity, capacity: usize) -> Self {
        Self {
            granularity,
            buckets: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, label: String, sales: f64, sum: f64) {
        self.buckets.push(Bucket { label, sales, sum });
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.iter()
    }

    /// Period labels, in order.
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.label.clone()).collect()
    }

    /// Sales totals, parallel to [`labels`](Self::labels).
    pub fn sales(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.sales).collect()
    }

    /// Secondary series totals, parallel to [`labels`](Self::labels).
    pub fn sums(&self) -> Vec<f64> {
        self.buckets.iter().map(|b| b.sum).collect()
    }

    pub fn total_sales(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, b| acc + b.sales)
    }

    pub fn total_sum(&self) -> f64 {
        self.buckets.iter().fold(0.0, |acc, b| acc + b.sum)
    }

    /// `(label, sales, sum)` triples.
    pub fn to_triples(&self) -> Vec<(String, f64, f64)> {
        self.buckets
            .iter()
            .map(|b| (b.label.clone(), b.sales, b.sum))
            .collect()
    }
}

/// A key used for caching fetched series by the range they were requested for.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&DateRange> for CacheKey {
    fn from(range: &DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_granularity_parse() {
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!(" MONTH ".parse::<Granularity>().unwrap(), Granularity::Month);
        assert_eq!("quarter".parse::<Granularity>().unwrap(), Granularity::Quarter);
        assert!(matches!(
            "year".parse::<Granularity>(),
            Err(ChartError::InvalidGranularity(_))
        ));
    }

    #[test]
    fn test_granularity_display_round_trip() {
        for granularity in Granularity::ALL {
            assert_eq!(granularity.to_string().parse::<Granularity>().unwrap(), granularity);
        }
    }

    #[test]
    fn test_range_validity() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(DateRange::new(a, b).is_valid());
        assert!(DateRange::new(a, a).is_valid());
        assert!(!DateRange::new(b, a).is_valid());
    }

    #[test]
    fn test_range_from_dates() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let range = DateRange::from_dates(start, end, CalendarZone::Utc).unwrap();
        assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_series_accessors() {
        let mut series = AggregatedSeries::empty(Granularity::Month);
        series.push("2024-01".to_string(), 100.0, 1.5);
        series.push("2024-02".to_string(), 50.0, 0.0);

        assert_eq!(series.len(), 2);
        assert_eq!(series.labels(), vec!["2024-01", "2024-02"]);
        assert_eq!(series.sales(), vec![100.0, 50.0]);
        assert_eq!(series.sums(), vec![1.5, 0.0]);
        assert_eq!(series.total_sales(), 150.0);
        assert_eq!(series.total_sum(), 1.5);
    }

    #[test]
    fn test_cache_key() {
        let a = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let key1 = CacheKey::from(&DateRange::new(a, b));
        let key2 = CacheKey::from(&DateRange::new(a, b));
        let key3 = CacheKey::from(&DateRange::new(a, a));

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }
}
