//! Calendar-date parsing and month coverage.
//!
//! Reservations are compared at date granularity only. Upstream timestamps are
//! reduced to the calendar date in their own offset; no timezone normalization
//! happens beyond that.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};

use crate::error::{Result, ReservoError};

/// Format used for every date crossing the tool boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a caller-supplied `YYYY-MM-DD` date.
///
/// Surrounding whitespace is ignored and unpadded fields are accepted, so
/// `" 2024-3-5"` parses; callers echo the date back via [`format_date`], which
/// always renders the padded form.
///
/// # Errors
/// Returns `ReservoError::InvalidDate` for anything that is not a valid
/// calendar date in exactly that format.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|e| ReservoError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Naive datetime layouts accepted from the backend, tried in order.
const NAIVE_TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset datetime layouts beyond strict RFC 3339 (compact `+0200` offsets,
/// space separator).
const OFFSET_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Reduce an upstream timestamp to its calendar date.
///
/// Accepts RFC 3339 (`2024-03-05T00:00:00.000Z`, `2024-03-05T10:00:00+02:00`),
/// compact offsets (`2024-03-05T10:00:00+0200`), naive datetimes with a `T` or
/// space separator and optional seconds, and bare dates. Offset values keep
/// the date as written in their own offset.
pub fn parse_timestamp(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    for format in OFFSET_TIMESTAMP_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, format) {
            return Some(dt.date_naive());
        }
    }
    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(ndt.date());
        }
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A calendar month, the unit the reservation backend is queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Whether the half-open date interval `[start, end)` touches this month.
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        let (Some(first), Some(next_first)) = (self.first_day(), self.next().first_day()) else {
            return false;
        };
        start < next_first && end > first
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Every month intersecting the half-open span `[start, end)`.
///
/// The last month is the one containing `end - 1 day`, so a span ending on the
/// first of a month does not pull in that month. When `end <= start` only the
/// month of `start` is returned.
pub fn covering_months(start: NaiveDate, end: NaiveDate) -> BTreeSet<YearMonth> {
    let first = YearMonth::of(start);
    let last = end
        .checked_sub_days(Days::new(1))
        .filter(|last_day| *last_day >= start)
        .map(YearMonth::of)
        .unwrap_or(first);

    let mut months = BTreeSet::new();
    let mut current = first;
    while current <= last {
        months.insert(current);
        current = current.next();
    }
    months
}
