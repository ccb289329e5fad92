//! Calendar classification and labelling.
//!
//! Everything here works on wall-calendar dates ([`NaiveDate`]); turning an
//! instant into a date is the job of [`CalendarZone`](crate::config::CalendarZone).

use chrono::{Datelike, Days, NaiveDate};

pub const DAYS_IN_WEEK: i64 = 7;
pub const WEEKS_IN_YEAR: i64 = 52;
pub const MONTHS_IN_YEAR: u32 = 12;
pub const QUARTERS_IN_YEAR: u32 = 4;
pub const MONTHS_PER_QUARTER: u32 = 3;

/// `(year, quarter)` with quarters numbered 1 through 4.
pub fn quarter_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month0() / MONTHS_PER_QUARTER + 1)
}

/// `YYYY-MM`
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// `YYYY/Qn`
pub fn quarter_label(date: NaiveDate) -> String {
    let (year, quarter) = quarter_of(date);
    format!("{}/Q{}", year, quarter)
}

/// `YYYY-MM-DD`
pub fn day_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Monday starting the week that contains `date`.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Day label of the Monday starting the week that contains `date`.
pub fn week_anchor_label(date: NaiveDate) -> String {
    day_label(week_anchor(date))
}

/// 1-based week index of `date` within its calendar year.
///
/// Weeks are counted in whole 7-day spans from the first Monday on or after
/// January 1. Days before that Monday land in week 0 and the last days of a
/// year can land in week 53; neither is clamped.
pub fn week_number(date: NaiveDate) -> i64 {
    let ordinal0 = i64::from(date.ordinal0());
    let weekday = i64::from(date.weekday().num_days_from_monday());
    let jan1_weekday = (weekday - ordinal0).rem_euclid(DAYS_IN_WEEK);
    let first_monday = (DAYS_IN_WEEK - jan1_weekday) % DAYS_IN_WEEK;

    (ordinal0 - first_monday).div_euclid(DAYS_IN_WEEK) + 1
}

/// A calendar bucket at one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Day(NaiveDate),
    /// Week of [`week_number`] within `year`
    Week { year: i32, week: i64 },
    /// `month` runs 1 through 12
    Month { year: i32, month: u32 },
    /// `quarter` runs 1 through 4
    Quarter { year: i32, quarter: u32 },
}

impl Period {
    /// The date a period's label is derived from.
    ///
    /// For weeks this is January 1 plus whole weeks, which is not necessarily
    /// a Monday.
    pub fn anchor(&self) -> Option<NaiveDate> {
        match *self {
            Period::Day(date) => Some(date),
            Period::Week { year, week } => {
                let offset = u64::try_from((week - 1) * DAYS_IN_WEEK).ok()?;
                NaiveDate::from_ymd_opt(year, 1, 1)?.checked_add_days(Days::new(offset))
            }
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
            Period::Quarter { year, quarter } => {
                NaiveDate::from_ymd_opt(year, quarter.checked_sub(1)? * MONTHS_PER_QUARTER + 1, 1)
            }
        }
    }

    pub fn label(&self) -> String {
        match *self {
            Period::Day(date) => day_label(date),
            Period::Week { year, week } => match self.anchor() {
                Some(anchor) => week_anchor_label(anchor),
                None => format!("{}/W{}", year, week),
            },
            Period::Month { year, month } => format!("{:04}-{:02}", year, month),
            Period::Quarter { year, quarter } => format!("{}/Q{}", year, quarter),
        }
    }

    /// Whether a calendar date belongs to this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Period::Day(day) => date == day,
            Period::Week { year, week } => date.year() == year && week_number(date) == week,
            Period::Month { year, month } => date.year() == year && date.month() == month,
            Period::Quarter { year, quarter } => quarter_of(date) == (year, quarter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_quarter_boundaries() {
        assert_eq!(quarter_of(date(2024, 1, 1)), (2024, 1));
        assert_eq!(quarter_of(date(2024, 3, 31)), (2024, 1));
        assert_eq!(quarter_of(date(2024, 4, 1)), (2024, 2));
        assert_eq!(quarter_of(date(2024, 9, 30)), (2024, 3));
        assert_eq!(quarter_of(date(2024, 12, 31)), (2024, 4));
    }

    #[test]
    fn test_labels() {
        assert_eq!(month_label(date(2024, 2, 29)), "2024-02");
        assert_eq!(quarter_label(date(2024, 11, 5)), "2024/Q4");
        assert_eq!(day_label(date(2024, 3, 1)), "2024-03-01");
        assert_eq!(month_label(date(987, 7, 4)), "0987-07");
    }

    #[test]
    fn test_week_anchor() {
        // 2024-03-04 is a Monday
        assert_eq!(week_anchor_label(date(2024, 3, 4)), "2024-03-04");
        assert_eq!(week_anchor_label(date(2024, 3, 6)), "2024-03-04");
        assert_eq!(week_anchor_label(date(2024, 3, 10)), "2024-03-04");
        assert_eq!(week_anchor_label(date(2024, 3, 11)), "2024-03-11");
        // crosses the year boundary
        assert_eq!(week_anchor_label(date(2023, 1, 1)), "2022-12-26");
    }

    #[test]
    fn test_week_number_year_starting_monday() {
        // 2024-01-01 is a Monday
        assert_eq!(week_number(date(2024, 1, 1)), 1);
        assert_eq!(week_number(date(2024, 1, 7)), 1);
        assert_eq!(week_number(date(2024, 1, 8)), 2);
        assert_eq!(week_number(date(2024, 12, 29)), 52);
        assert_eq!(week_number(date(2024, 12, 30)), 53);
    }

    #[test]
    fn test_week_number_before_first_monday() {
        // 2021-01-04 is the first Monday of 2021
        assert_eq!(week_number(date(2021, 1, 1)), 0);
        assert_eq!(week_number(date(2021, 1, 3)), 0);
        assert_eq!(week_number(date(2021, 1, 4)), 1);
        // 2023-01-01 is a Sunday, 2023-01-02 the first Monday
        assert_eq!(week_number(date(2023, 1, 1)), 0);
        assert_eq!(week_number(date(2023, 1, 2)), 1);
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(Period::Day(date(2024, 3, 2)).label(), "2024-03-02");
        assert_eq!(Period::Month { year: 2024, month: 1 }.label(), "2024-01");
        assert_eq!(Period::Quarter { year: 2024, quarter: 3 }.label(), "2024/Q3");
        assert_eq!(Period::Week { year: 2024, week: 1 }.label(), "2024-01-01");
        assert_eq!(Period::Week { year: 2024, week: 10 }.label(), "2024-03-04");
        // anchor 2023-01-01 is a Sunday; its week starts the previous Monday
        assert_eq!(Period::Week { year: 2023, week: 1 }.label(), "2022-12-26");
    }

    #[test]
    fn test_period_membership() {
        let week = Period::Week { year: 2024, week: 2 };
        assert!(week.contains(date(2024, 1, 8)));
        assert!(week.contains(date(2024, 1, 14)));
        assert!(!week.contains(date(2024, 1, 15)));
        assert!(!week.contains(date(2025, 1, 8)));

        let month = Period::Month { year: 2024, month: 2 };
        assert!(month.contains(date(2024, 2, 29)));
        assert!(!month.contains(date(2023, 2, 1)));

        let quarter = Period::Quarter { year: 2024, quarter: 2 };
        assert!(quarter.contains(date(2024, 5, 1)));
        assert!(!quarter.contains(date(2024, 7, 1)));

        let day = Period::Day(date(2024, 3, 1));
        assert!(day.contains(date(2024, 3, 1)));
        assert!(!day.contains(date(2024, 3, 2)));
    }

    #[test]
    fn test_period_anchor() {
        assert_eq!(Period::Quarter { year: 2024, quarter: 4 }.anchor(), Some(date(2024, 10, 1)));
        assert_eq!(Period::Week { year: 2024, week: 52 }.anchor(), Some(date(2024, 12, 23)));
        assert_eq!(Period::Month { year: 2024, month: 13 }.anchor(), None);
    }
}
