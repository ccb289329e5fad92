//! # Data Sources
//!
//! A data source answers a date range with a [`DailySalesResponse`]: a success
//! flag, an error message and, on success, the two sparse series to chart.

mod cache;
pub mod json;
mod response;

pub use cache::ResponseCache;
pub use json::JsonFileSource;
pub use response::{DailySales, DailySalesResponse};

use futures::future::BoxFuture;

use crate::error::Result;
use crate::types::DateRange;

/// Anything that can supply daily sales for a date range.
///
/// `Err` means the source could not be reached or read; a reachable source
/// that reports a failure returns `Ok` with `is_success == false`.
pub trait DataSource: Send + Sync {
    fn fetch<'a>(&'a self, range: &'a DateRange) -> BoxFuture<'a, Result<DailySalesResponse>>;
}
