//! Reservation records, raw and normalized.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar::{format_date, parse_timestamp};

/// A reservation exactly as the backend sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReservation {
    /// Opaque identifier. The backend may send a string or a number.
    #[serde(deserialize_with = "opaque_id")]
    pub reservation_id: String,
    pub booked_by: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub created_at: String,
}

fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

/// A reservation reduced to the half-open calendar-date interval `[start, end)`.
///
/// The end date itself is free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub id: String,
    pub booked_by: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub created_at: String,
}

impl Reservation {
    /// Normalize a raw record. Returns `None` when either timestamp is unreadable.
    pub fn from_raw(raw: &RawReservation) -> Option<Self> {
        Some(Self {
            id: raw.reservation_id.clone(),
            booked_by: raw.booked_by.clone(),
            start: parse_timestamp(&raw.start_date)?,
            end: parse_timestamp(&raw.end_date)?,
            created_at: raw.created_at.clone(),
        })
    }

    /// `start <= date < end`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Open overlap with `[start, end)`: `self.start < end && self.end > start`.
    ///
    /// A reservation ending on `start`, or starting on `end`, does not overlap.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && self.end > start
    }

    /// Zero-length or inverted interval.
    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }
}

/// A reservation projected for output, dates rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub id: String,
    pub booked_by: String,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
}

impl From<&Reservation> for ConflictRecord {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.clone(),
            booked_by: r.booked_by.clone(),
            start_date: format_date(r.start),
            end_date: format_date(r.end),
            created_at: r.created_at.clone(),
        }
    }
}
