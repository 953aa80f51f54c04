//! Single-date and date-range availability for one bookable entity.
//!
//! Every query loads a fresh [`IntervalStore`] snapshot from the injected
//! [`ReservationSource`]; nothing is cached between calls.

use chrono::{Days, NaiveDate};

use crate::calendar::YearMonth;
use crate::config::EngineConfig;
use crate::conflict::{find_conflicts, find_occupant};
use crate::error::{Result, ReservoError};
use crate::freebusy::{find_free_intervals, FreeInterval};
use crate::http::HttpSource;
use crate::reservation::ConflictRecord;
use crate::source::ReservationSource;
use crate::store::IntervalStore;

/// Answer to a single-date query.
#[derive(Debug, Clone, PartialEq)]
pub struct DateAvailability {
    pub available: bool,
    pub date: NaiveDate,
    pub entity_id: String,
    /// The reservation occupying `date`, if any.
    pub reservation: Option<ConflictRecord>,
    /// Months that could not be fetched and were treated as empty.
    pub degraded_months: Vec<YearMonth>,
}

/// Answer to a range query over `[start, end)`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeAvailability {
    /// True iff `conflicts` is empty.
    pub available: bool,
    pub entity_id: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Reservations intersecting the range, sorted by start date.
    pub conflicts: Vec<ConflictRecord>,
    /// Maximal free intervals. `None` when the range has no conflicts, since
    /// the whole range is then free.
    pub available_periods: Option<Vec<FreeInterval>>,
    /// Months that could not be fetched and were treated as empty.
    pub degraded_months: Vec<YearMonth>,
}

pub struct AvailabilityEngine<S> {
    source: S,
}

impl AvailabilityEngine<HttpSource> {
    /// Engine backed by the HTTP reservation backend described by `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(HttpSource::new(config)?))
    }
}

impl<S: ReservationSource> AvailabilityEngine<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Is `date` free for `entity_id`?
    ///
    /// Only the month containing `date` is fetched. If several reservations
    /// cover `date`, the first one in fetch order is reported.
    ///
    /// # Errors
    /// Returns `ReservoError::InvalidArgument` for a blank entity id.
    pub async fn check_date(&self, entity_id: &str, date: NaiveDate) -> Result<DateAvailability> {
        let entity_id = validate_entity(entity_id)?;
        let next_day = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| ReservoError::Internal(format!("date out of range: {}", date)))?;

        let store = IntervalStore::load(&self.source, entity_id, date, next_day).await;
        let occupant = find_occupant(store.reservations(), date);

        tracing::debug!(
            entity_id,
            %date,
            available = occupant.is_none(),
            "single-date check"
        );

        Ok(DateAvailability {
            available: occupant.is_none(),
            date,
            entity_id: entity_id.to_string(),
            reservation: occupant.map(ConflictRecord::from),
            degraded_months: store.degraded_months().to_vec(),
        })
    }

    /// Conflicts and free intervals for `entity_id` over `[start, end)`.
    ///
    /// # Errors
    /// Returns `ReservoError::InvalidRange` when `start >= end` (no fetch is
    /// made) and `ReservoError::InvalidArgument` for a blank entity id.
    pub async fn check_range(
        &self,
        entity_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RangeAvailability> {
        let entity_id = validate_entity(entity_id)?;
        if start >= end {
            return Err(ReservoError::InvalidRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        let store = IntervalStore::load(&self.source, entity_id, start, end).await;
        let conflicts = find_conflicts(store.reservations(), start, end);

        let available_periods = if conflicts.is_empty() {
            None
        } else {
            Some(find_free_intervals(conflicts.iter().copied(), start, end))
        };

        tracing::debug!(
            entity_id,
            %start,
            %end,
            conflicts = conflicts.len(),
            free_intervals = available_periods.as_ref().map_or(0, Vec::len),
            "range check"
        );

        Ok(RangeAvailability {
            available: conflicts.is_empty(),
            entity_id: entity_id.to_string(),
            start,
            end,
            conflicts: conflicts.into_iter().map(ConflictRecord::from).collect(),
            available_periods,
            degraded_months: store.degraded_months().to_vec(),
        })
    }
}

fn validate_entity(entity_id: &str) -> Result<&str> {
    let trimmed = entity_id.trim();
    if trimmed.is_empty() {
        return Err(ReservoError::InvalidArgument(
            "entity_id must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}
