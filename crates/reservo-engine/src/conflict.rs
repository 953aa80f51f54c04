//! Detect reservations that intersect a query range.
//!
//! Adjacent reservations (one ending exactly on the query start, or starting
//! exactly on the query end) are NOT conflicts.

use chrono::NaiveDate;

use crate::reservation::Reservation;

/// Find every reservation overlapping `[start, end)`.
///
/// A reservation conflicts when `start < reservation.end && end > reservation.start`.
/// The result is sorted by `(start, end)`; the sort is stable, so reservations
/// with identical intervals stay in the order they were fetched.
pub fn find_conflicts(
    reservations: &[Reservation],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&Reservation> {
    let mut conflicts: Vec<&Reservation> = reservations
        .iter()
        .filter(|r| r.overlaps(start, end))
        .collect();
    conflicts.sort_by_key(|r| (r.start, r.end));
    conflicts
}

/// The first reservation, in fetch order, that occupies `date`.
///
/// When the source holds overlapping reservations for the same day, which one
/// is reported depends on the order the backend returned them in.
pub fn find_occupant(reservations: &[Reservation], date: NaiveDate) -> Option<&Reservation> {
    reservations.iter().find(|r| r.covers(date))
}
