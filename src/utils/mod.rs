//! Calendar utilities and the aggregation engine built on them.

pub mod aggregation;
pub mod calendar;
pub mod series;

pub use aggregation::{aggregate, periods, Aggregator};
pub use calendar::Period;
pub use series::{parse_key, points_from_keyed};
