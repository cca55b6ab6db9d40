//! Folding daily consumption into window and monthly totals

use super::window::{DailySeries, LookbackWindow, DAYS_PER_MONTH, MONTHS};
use serde::Serialize;

/// Consumed write and read capacity units over some period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    pub writes: f64,
    pub reads: f64,
}

/// Totals for the whole window and for each 30-day bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UsageAggregate {
    pub window: UsageTotals,
    /// Newest first: `months[0]` covers the most recent 30 days.
    pub months: [UsageTotals; MONTHS],
}

/// Bucket for a day index counted from the window start (newest first)
fn month_slot(day_index: usize) -> usize {
    MONTHS - 1 - day_index / DAYS_PER_MONTH as usize
}

/// Sum consumed writes and reads over `window`.
///
/// Buckets are assigned by date, so a missing day never shifts later days
/// into a neighbouring bucket. Datapoints outside the window are ignored.
pub fn aggregate(
    window: &LookbackWindow,
    writes: &DailySeries,
    reads: &DailySeries,
) -> UsageAggregate {
    let mut aggregate = UsageAggregate::default();

    for (date, value) in writes {
        if let Some(index) = window.day_index(*date) {
            aggregate.window.writes += value;
            aggregate.months[month_slot(index)].writes += value;
        }
    }
    for (date, value) in reads {
        if let Some(index) = window.day_index(*date) {
            aggregate.window.reads += value;
            aggregate.months[month_slot(index)].reads += value;
        }
    }

    aggregate
}
