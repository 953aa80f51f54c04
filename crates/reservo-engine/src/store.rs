//! Normalized reservation intervals for one query.
//!
//! Fetches every calendar month the query span touches, in parallel, and
//! flattens the results into a single list of date intervals. A month that
//! fails to load counts as having no reservations.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use futures::future::join_all;

use crate::calendar::{covering_months, YearMonth};
use crate::reservation::Reservation;
use crate::source::ReservationSource;

/// A snapshot of one entity's reservations over the months covering a span.
#[derive(Debug, Clone, Default)]
pub struct IntervalStore {
    months: BTreeSet<YearMonth>,
    reservations: Vec<Reservation>,
    degraded: Vec<YearMonth>,
}

impl IntervalStore {
    /// Load the reservations needed to answer a query over `[start, end)`.
    ///
    /// Each covering month is fetched exactly once. Records keep month order,
    /// then source order within a month. Dropped along the way:
    /// - records with unreadable timestamps; their month is also reported in
    ///   [`degraded_months`](Self::degraded_months), since the dates they cover
    ///   cannot be trusted as free,
    /// - zero-length or inverted intervals,
    /// - exact repeats (same id and interval) returned by more than one month.
    ///   A plain concatenation of the month results would list such a
    ///   reservation once per month, and it would then show up repeatedly in
    ///   range conflicts; here it appears once.
    pub async fn load<S>(source: &S, entity_id: &str, start: NaiveDate, end: NaiveDate) -> Self
    where
        S: ReservationSource + ?Sized,
    {
        let months = covering_months(start, end);
        let fetches = months.iter().map(|month| async move {
            let result = source.fetch_month(entity_id, *month).await;
            (*month, result)
        });
        let results = join_all(fetches).await;

        let mut reservations = Vec::new();
        let mut degraded = Vec::new();
        let mut seen: HashSet<(String, NaiveDate, NaiveDate)> = HashSet::new();

        for (month, result) in results {
            let raw_records = match result {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        entity_id,
                        %month,
                        error = %e,
                        "reservation fetch failed, treating month as empty"
                    );
                    degraded.push(month);
                    continue;
                }
            };

            let mut month_degraded = false;
            for raw in &raw_records {
                let Some(reservation) = Reservation::from_raw(raw) else {
                    tracing::warn!(
                        entity_id,
                        %month,
                        reservation_id = %raw.reservation_id,
                        start = %raw.start_date,
                        end = %raw.end_date,
                        "skipping reservation with unreadable dates, marking month degraded"
                    );
                    month_degraded = true;
                    continue;
                };
                if reservation.is_degenerate() {
                    tracing::debug!(
                        entity_id,
                        reservation_id = %reservation.id,
                        "skipping zero-length or inverted reservation"
                    );
                    continue;
                }
                let key = (reservation.id.clone(), reservation.start, reservation.end);
                if !seen.insert(key) {
                    continue;
                }
                reservations.push(reservation);
            }
            if month_degraded {
                degraded.push(month);
            }
        }

        tracing::debug!(
            entity_id,
            months = months.len(),
            reservations = reservations.len(),
            degraded = degraded.len(),
            "interval store loaded"
        );

        Self {
            months,
            reservations,
            degraded,
        }
    }

    /// Build a store directly from normalized reservations, bypassing any fetch.
    pub fn from_reservations(reservations: Vec<Reservation>) -> Self {
        Self {
            reservations: reservations
                .into_iter()
                .filter(|r| !r.is_degenerate())
                .collect(),
            ..Self::default()
        }
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Months that were fetched (or attempted).
    pub fn months(&self) -> &BTreeSet<YearMonth> {
        &self.months
    }

    /// Months whose fetch failed and were treated as empty, or that held
    /// records with unreadable dates.
    pub fn degraded_months(&self) -> &[YearMonth] {
        &self.degraded
    }

    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }
}
