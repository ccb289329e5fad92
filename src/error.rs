//! # Errors
//!
//! Everything that can go wrong around the aggregation engine: reading data,
//! decoding responses, loading configuration and drawing charts. Aggregation
//! itself never fails.

use thiserror::Error;

/// Errors surfaced by data sources, configuration and rendering.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The data source answered, but reported a failure.
    #[error("data source error: {0}")]
    DataSource(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("unknown granularity: {0} (expected day, week, month or quarter)")]
    InvalidGranularity(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("plot error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
