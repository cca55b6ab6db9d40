//! The fixed 90-day lookback window and the sparse daily series inside it

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Length of the lookback window in days
pub const LOOKBACK_DAYS: i64 = 90;

/// Days per monthly bucket. AWS bills around 720-hour months.
pub const DAYS_PER_MONTH: i64 = 30;

/// Number of monthly buckets in the window
pub const MONTHS: usize = (LOOKBACK_DAYS / DAYS_PER_MONTH) as usize;

/// Daily values keyed by UTC date. Days without a datapoint are absent.
pub type DailySeries = BTreeMap<NaiveDate, f64>;

/// Half-open date range `[start, end)` of exactly `LOOKBACK_DAYS` days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookbackWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl LookbackWindow {
    /// Window whose last included day is the day before `end`
    pub fn ending_at(end: NaiveDate) -> Self {
        Self {
            start: end - Duration::days(LOOKBACK_DAYS),
            end,
        }
    }

    /// Window ending `offset_days` before `today`.
    ///
    /// An offset of 1 excludes today, which is still accumulating datapoints.
    pub fn ending_days_before(today: NaiveDate, offset_days: u32) -> Self {
        Self::ending_at(today - Duration::days(i64::from(offset_days)))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Midnight UTC at the window start
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Midnight UTC at the (exclusive) window end
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::MIN).and_utc()
    }

    /// Elapsed days from the window start, or `None` outside the window
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.start).num_days();
        (0..LOOKBACK_DAYS)
            .contains(&offset)
            .then_some(offset as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.day_index(date).is_some()
    }
}

impl std::fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}
