use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::config::CalendarZone;
use crate::types::{AggregatedSeries, DateRange, Granularity, TimePoint};
use crate::utils::calendar::{Period, MONTHS_IN_YEAR, QUARTERS_IN_YEAR, WEEKS_IN_YEAR};
use crate::utils::series::points_from_keyed;

/// Enumerate the periods covering `start..=end` in chronological order.
///
/// Days and months are clipped to the range. Weeks and quarters walk the whole
/// grid of every calendar year the range touches, so the result can contain
/// periods outside the range.
pub fn periods(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<Period> {
    if start > end {
        return Vec::new();
    }

    let years = start.year()..=end.year();
    match granularity {
        Granularity::Day => {
            let mut periods = Vec::new();
            let mut day = start;
            loop {
                periods.push(Period::Day(day));
                match day.succ_opt() {
                    Some(next) if day < end => day = next,
                    _ => break,
                }
            }
            periods
        }
        Granularity::Week => years
            .flat_map(|year| (1..=WEEKS_IN_YEAR).map(move |week| Period::Week { year, week }))
            .collect(),
        Granularity::Month => {
            let mut periods = Vec::new();
            let (mut year, mut month) = (start.year(), start.month());
            while (year, month) <= (end.year(), end.month()) {
                periods.push(Period::Month { year, month });
                month += 1;
                if month > MONTHS_IN_YEAR {
                    month = 1;
                    year += 1;
                }
            }
            periods
        }
        Granularity::Quarter => years
            .flat_map(|year| {
                (1..=QUARTERS_IN_YEAR).map(move |quarter| Period::Quarter { year, quarter })
            })
            .collect(),
    }
}

/// Regroups sparse series into calendar buckets.
///
/// Instants are read on the wall calendar of the configured zone; every
/// classification happens on the resulting dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    zone: CalendarZone,
}

impl Aggregator {
    pub fn new(zone: CalendarZone) -> Self {
        Self { zone }
    }

    /// Aggregate both series over `range` at `granularity`.
    ///
    /// Returns one bucket per enumerated period, empty periods included. An
    /// inverted range (`start > end`) yields no buckets.
    pub fn aggregate(
        &self,
        sales: &[TimePoint],
        sum: &[TimePoint],
        range: &DateRange,
        granularity: Granularity,
    ) -> AggregatedSeries {
        if !range.is_valid() {
            tracing::debug!(start = %range.start, end = %range.end, "inverted range, nothing to aggregate");
            return AggregatedSeries::empty(granularity);
        }

        let start = self.zone.date_of(range.start);
        let end = self.zone.date_of(range.end);
        let periods = periods(start, end, granularity);

        let sales = self.to_dates(sales);
        let sum = self.to_dates(sum);

        let mut aggregated = AggregatedSeries::with_capacity(granularity, periods.len());
        for period in &periods {
            aggregated.push(period.label(), total_in(period, &sales), total_in(period, &sum));
        }

        tracing::debug!(
            granularity = %granularity,
            buckets = aggregated.len(),
            "aggregated series"
        );
        aggregated
    }

    /// Parse keyed series and aggregate them; unparsable keys are skipped.
    pub fn aggregate_keyed(
        &self,
        sales: &BTreeMap<String, f64>,
        sum: &BTreeMap<String, f64>,
        range: &DateRange,
        granularity: Granularity,
    ) -> AggregatedSeries {
        let sales = points_from_keyed(sales, self.zone);
        let sum = points_from_keyed(sum, self.zone);
        self.aggregate(&sales, &sum, range, granularity)
    }

    fn to_dates(&self, points: &[TimePoint]) -> Vec<(NaiveDate, f64)> {
        points
            .iter()
            .map(|p| (self.zone.date_of(p.timestamp), p.value))
            .collect()
    }
}

fn total_in(period: &Period, points: &[(NaiveDate, f64)]) -> f64 {
    points
        .iter()
        .filter(|(date, _)| period.contains(*date))
        .fold(0.0, |acc, (_, value)| acc + value)
}

/// Aggregate on the local calendar of the running machine.
pub fn aggregate(
    sales: &[TimePoint],
    sum: &[TimePoint],
    range: &DateRange,
    granularity: Granularity,
) -> AggregatedSeries {
    Aggregator::default().aggregate(sales, sum, range, granularity)
}
