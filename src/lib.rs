//! # Sales Chart Aggregation Library
//!
//! `salescharts` regroups sparse daily sales series into calendar-aligned
//! buckets (day, week, month or quarter) ready to be charted.
//!
//! ## Features
//!
//! - Calendar classification and labelling of dates
//! - Aggregation of two parallel series over a date range
//! - Empty periods kept in the output, with zero totals
//! - Loading series from a data source, with switch-to-latest semantics
//! - Caching of fetched ranges
//! - Rendering of the aggregated series as a bar + line chart
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use chrono::NaiveDate;
//! use salescharts::{Aggregator, CalendarZone, DateRange, Granularity};
//!
//! let mut sales = BTreeMap::new();
//! sales.insert("2024-01-15".to_string(), 100.0);
//! sales.insert("2024-02-10".to_string(), 50.0);
//!
//! let zone = CalendarZone::Utc;
//! let range = DateRange::from_dates(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
//!     zone,
//! )
//! .unwrap();
//!
//! let series = Aggregator::new(zone).aggregate_keyed(&sales, &BTreeMap::new(), &range, Granularity::Month);
//! assert_eq!(series.labels(), vec!["2024-01", "2024-02"]);
//! assert_eq!(series.sales(), vec![100.0, 50.0]);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod plotting;
pub mod source;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use app::{ChartSettings, SalesChart};
pub use config::{CalendarZone, Config};
pub use error::{ChartError, Result};
pub use types::{AggregatedSeries, Bucket, DateRange, Granularity, TimePoint};
pub use utils::{aggregate, Aggregator};
