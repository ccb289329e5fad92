use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::CalendarZone;
use crate::error::{ChartError, Result};
use crate::types::DateRange;
use crate::utils::series::parse_key;

/// Two sparse series keyed by timestamp or date string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySales {
    /// Raw sales values
    #[serde(default)]
    pub sales_data: BTreeMap<String, f64>,
    /// Secondary "sum" values, in thousands
    #[serde(default)]
    pub sum_data: BTreeMap<String, f64>,
}

impl DailySales {
    /// Keep only the entries whose calendar date lies inside `range`.
    ///
    /// Entries with unparsable keys are kept; the aggregator skips them.
    pub fn within(&self, range: &DateRange, zone: CalendarZone) -> DailySales {
        let start = zone.date_of(range.start);
        let end = zone.date_of(range.end);
        let keep = |series: &BTreeMap<String, f64>| -> BTreeMap<String, f64> {
            series
                .iter()
                .filter(|(key, _)| match parse_key(key, zone) {
                    Some(instant) => {
                        let date = zone.date_of(instant);
                        date >= start && date <= end
                    }
                    None => true,
                })
                .map(|(key, value)| (key.clone(), *value))
                .collect()
        };

        DailySales {
            sales_data: keep(&self.sales_data),
            sum_data: keep(&self.sum_data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sales_data.is_empty() && self.sum_data.is_empty()
    }
}

/// Result wrapper returned by a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySalesResponse {
    pub is_success: bool,
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub value: Option<DailySales>,
}

impl DailySalesResponse {
    pub fn success(value: DailySales) -> Self {
        Self {
            is_success: true,
            error: String::new(),
            value: Some(value),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            is_success: false,
            error: error.into(),
            value: None,
        }
    }

    /// The payload of a successful response, or the reported error.
    pub fn into_result(self) -> Result<DailySales> {
        if !self.is_success {
            let message = if self.error.trim().is_empty() {
                "request failed".to_string()
            } else {
                self.error
            };
            return Err(ChartError::DataSource(message));
        }
        self.value
            .ok_or_else(|| ChartError::DataSource("response carried no payload".to_string()))
    }
}
