use chrono::{DateTime, Months, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::{ChartError, Result};
use crate::source::{DailySales, DailySalesResponse, DataSource, ResponseCache};
use crate::types::{AggregatedSeries, CacheKey, DateRange, Granularity};
use crate::utils::Aggregator;

/// The user's current chart selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSettings {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
}

impl ChartSettings {
    /// The month leading up to `now`, bucketed by month.
    pub fn default_at(now: DateTime<Utc>) -> Self {
        Self {
            start: now.checked_sub_months(Months::new(1)).unwrap_or(now),
            end: now,
            granularity: Granularity::Month,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self::default_at(Utc::now())
    }
}

/// Identifies one load request; only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    range: DateRange,
}

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn range(&self) -> DateRange {
        self.range
    }
}

/// Chart state: the selection, the last loaded series and the load status.
///
/// Aggregation is an explicit call on this state ([`chart_data`](Self::chart_data));
/// nothing is recomputed behind the caller's back.
pub struct SalesChart {
    pub settings: ChartSettings,
    pub is_loading: bool,
    pub data: Option<DailySales>,
    pub error_message: Option<String>,
    /// Range the current `data` was fetched for
    pub loaded_range: Option<DateRange>,
    aggregator: Aggregator,
    cache: ResponseCache,
    generation: u64,
    pending: Option<(LoadTicket, JoinHandle<Result<DailySalesResponse>>)>,
}

impl SalesChart {
    pub fn new(config: &Config) -> Self {
        let mut settings = ChartSettings::default();
        settings.granularity = config.default_granularity;

        Self {
            settings,
            is_loading: false,
            data: None,
            error_message: None,
            loaded_range: None,
            aggregator: Aggregator::new(config.zone),
            cache: ResponseCache::new(config.cache_capacity),
            generation: 0,
            pending: None,
        }
    }

    pub fn with_settings(mut self, settings: ChartSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the selection. Returns whether anything changed.
    pub fn set_settings(&mut self, settings: ChartSettings) -> bool {
        if settings == self.settings {
            return false;
        }
        self.settings = settings;
        true
    }

    /// Whether the loaded data was fetched for a different range than the
    /// one currently selected.
    pub fn needs_load(&self) -> bool {
        self.loaded_range != Some(self.settings.range())
    }

    /// Start a load for the current range, superseding any earlier one.
    pub fn begin_load(&mut self) -> LoadTicket {
        if let Some((ticket, handle)) = self.pending.take() {
            tracing::debug!(generation = ticket.generation, "aborting superseded load");
            handle.abort();
        }

        self.generation += 1;
        self.is_loading = true;
        LoadTicket {
            generation: self.generation,
            range: self.settings.range(),
        }
    }

    /// Apply the outcome of a load.
    ///
    /// Returns `Ok(true)` when fresh data was stored and `Ok(false)` when the
    /// ticket was superseded and the outcome dropped. A failed load is
    /// recorded in `error_message` and returned as the error.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<DailySalesResponse>,
    ) -> Result<bool> {
        if ticket.generation != self.generation {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.generation,
                "ignoring stale load result"
            );
            return Ok(false);
        }

        self.is_loading = false;
        match result.and_then(DailySalesResponse::into_result) {
            Ok(sales) => {
                if sales.is_empty() {
                    tracing::debug!(start = %ticket.range.start, end = %ticket.range.end, "no sales in range");
                }
                tracing::info!(
                    sales = sales.sales_data.len(),
                    sums = sales.sum_data.len(),
                    "loaded chart data"
                );
                self.cache.store(CacheKey::from(&ticket.range), sales.clone());
                self.data = Some(sales);
                self.loaded_range = Some(ticket.range);
                self.error_message = None;
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load chart data");
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn cached(&mut self, range: &DateRange) -> Option<DailySales> {
        let hit = self.cache.get(&CacheKey::from(range)).cloned();
        if hit.is_some() {
            tracing::debug!(start = %range.start, end = %range.end, "serving chart data from cache");
        }
        hit
    }

    /// Load the current range, from cache when possible.
    pub async fn load(&mut self, source: &dyn DataSource) -> Result<()> {
        let ticket = self.begin_load();
        let result = match self.cached(&ticket.range) {
            Some(sales) => Ok(DailySalesResponse::success(sales)),
            None => source.fetch(&ticket.range).await,
        };
        self.finish_load(ticket, result).map(|_| ())
    }

    /// Start loading the current range on the tokio runtime.
    ///
    /// Any load still in flight is aborted. Collect the outcome with
    /// [`wait_for_load`](Self::wait_for_load).
    pub fn spawn_load(&mut self, source: Arc<dyn DataSource>) -> LoadTicket {
        let ticket = self.begin_load();
        let range = ticket.range;

        let handle = match self.cached(&range) {
            Some(sales) => {
                tokio::spawn(async move { Ok::<_, ChartError>(DailySalesResponse::success(sales)) })
            }
            None => tokio::spawn(async move { source.fetch(&range).await }),
        };
        self.pending = Some((ticket, handle));
        ticket
    }

    /// Wait for the load started by [`spawn_load`](Self::spawn_load).
    ///
    /// Returns `Ok(false)` when nothing was in flight.
    pub async fn wait_for_load(&mut self) -> Result<bool> {
        let Some((ticket, handle)) = self.pending.take() else {
            return Ok(false);
        };

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(ChartError::DataSource(format!("load task failed: {}", e))),
        };
        self.finish_load(ticket, result)
    }

    /// Aggregate the loaded data with the current selection.
    ///
    /// Empty when nothing is loaded or the last load failed. While
    /// [`needs_load`](Self::needs_load) is true the data still covers
    /// `loaded_range`, so periods outside it read as zero until the next load
    /// lands.
    pub fn chart_data(&self) -> AggregatedSeries {
        match (&self.data, &self.error_message) {
            (Some(data), None) => self.aggregator.aggregate_keyed(
                &data.sales_data,
                &data.sum_data,
                &self.settings.range(),
                self.settings.granularity,
            ),
            _ => AggregatedSeries::empty(self.settings.granularity),
        }
    }
}

impl Default for SalesChart {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
