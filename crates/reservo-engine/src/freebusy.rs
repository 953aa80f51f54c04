//! Compute free date intervals inside a query range.
//!
//! Sorts conflicting reservations by start date, merges overlapping or adjacent
//! blocked spans, then takes the gaps between merged spans within the query.
//! Reservation end dates are free and start dates are occupied, exactly as a
//! day-by-day scan would see them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservation::Reservation;

/// A maximal free half-open interval `[start_date, end_date)`.
///
/// Dates serialize as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FreeInterval {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Merge the blocked spans of `reservations`, clipped to `[start, end)`.
///
/// Returns a sorted, non-overlapping list of `(start, end)` date intervals.
pub fn merge_blocked<'a, I>(reservations: I, start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    let mut intervals: Vec<(NaiveDate, NaiveDate)> = reservations
        .into_iter()
        .filter(|r| r.overlaps(start, end))
        .map(|r| (r.start.max(start), r.end.min(end)))
        .collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort_unstable();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(intervals.len());
    for (s, e) in intervals {
        if let Some(last) = merged.last_mut() {
            if s <= last.1 {
                // Overlapping or touching: a day freed by one reservation's end is
                // taken again by the next one's start.
                last.1 = last.1.max(e);
                continue;
            }
        }
        merged.push((s, e));
    }

    merged
}

/// Find the maximal free intervals within `[start, end)`.
///
/// With no overlapping reservations the whole range comes back as one interval.
/// An empty or inverted range yields nothing.
pub fn find_free_intervals<'a, I>(reservations: I, start: NaiveDate, end: NaiveDate) -> Vec<FreeInterval>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    if start >= end {
        return Vec::new();
    }

    let merged = merge_blocked(reservations, start, end);

    let mut free = Vec::new();
    let mut cursor = start;

    for (busy_start, busy_end) in &merged {
        if cursor < *busy_start {
            free.push(FreeInterval::new(cursor, *busy_start));
        }
        cursor = cursor.max(*busy_end);
    }

    if cursor < end {
        free.push(FreeInterval::new(cursor, end));
    }

    free
}
