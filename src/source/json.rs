use futures::future::{BoxFuture, FutureExt};
use std::path::{Path, PathBuf};

use super::{DailySalesResponse, DataSource};
use crate::config::CalendarZone;
use crate::error::Result;
use crate::types::DateRange;

/// Serves a response document stored on disk.
///
/// The file is re-read on every fetch and trimmed to the requested range, the
/// way a server would only return the days that were asked for.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    zone: CalendarZone,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            zone: CalendarZone::default(),
        }
    }

    /// Calendar used when trimming entries to the requested range
    pub fn with_zone(mut self, zone: CalendarZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self, range: &DateRange) -> Result<DailySalesResponse> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let mut response: DailySalesResponse = serde_json::from_str(&raw)?;

        if let Some(value) = response.value.take() {
            response.value = Some(value.within(range, self.zone));
        }

        tracing::info!(
            path = %self.path.display(),
            success = response.is_success,
            "read sales data"
        );
        Ok(response)
    }
}

impl DataSource for JsonFileSource {
    fn fetch<'a>(&'a self, range: &'a DateRange) -> BoxFuture<'a, Result<DailySalesResponse>> {
        self.read(range).boxed()
    }
}
