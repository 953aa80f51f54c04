//! Property-based tests for conflict detection and free-interval decomposition.
//!
//! These check invariants that should hold for *any* reservation set, not just
//! the hand-picked cases in `freebusy_tests.rs`.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use reservo_engine::{find_conflicts, find_free_intervals, FreeInterval, Reservation};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: u64) -> NaiveDate {
    base().checked_add_days(Days::new(offset)).unwrap()
}

/// A reservation starting within ~3 months of the base date, 1-14 nights long.
fn arb_reservation() -> impl Strategy<Value = Reservation> {
    (0u64..90, 1u64..=14, 0u32..1000).prop_map(|(start, nights, id)| Reservation {
        id: id.to_string(),
        booked_by: "guest".to_string(),
        start: day(start),
        end: day(start + nights),
        created_at: String::new(),
    })
}

fn arb_reservations() -> impl Strategy<Value = Vec<Reservation>> {
    prop::collection::vec(arb_reservation(), 0..12)
}

/// A non-empty query range `[start, end)`.
fn arb_query() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (0u64..100, 1u64..=60).prop_map(|(start, len)| (day(start), day(start + len)))
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn next(d: NaiveDate) -> NaiveDate {
    d.succ_opt().unwrap()
}

/// Reference decomposition: walk the range a day at a time, skipping straight
/// to the end of whichever conflict covers the cursor.
fn day_scan(conflicts: &[&Reservation], start: NaiveDate, end: NaiveDate) -> Vec<FreeInterval> {
    let covering = |d: NaiveDate| conflicts.iter().find(|r| r.covers(d)).copied();
    let mut free = Vec::new();
    let mut cursor = start;
    while cursor < end {
        match covering(cursor) {
            Some(r) => cursor = r.end,
            None => {
                let run_start = cursor;
                while cursor < end && covering(cursor).is_none() {
                    cursor = next(cursor);
                }
                free.push(FreeInterval::new(run_start, cursor));
            }
        }
    }
    free
}

// ---------------------------------------------------------------------------
// Property 1: Conflicts and free intervals partition the query range
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn conflicts_and_free_intervals_partition_range(
        reservations in arb_reservations(),
        (start, end) in arb_query(),
    ) {
        let conflicts = find_conflicts(&reservations, start, end);
        let free = find_free_intervals(conflicts.iter().copied(), start, end);

        let mut d = start;
        while d < end {
            let blocked = conflicts.iter().any(|r| r.covers(d));
            let in_free = free
                .iter()
                .filter(|f| f.start_date <= d && d < f.end_date)
                .count();
            prop_assert!(
                (blocked && in_free == 0) || (!blocked && in_free == 1),
                "day {} blocked={} in_free={}",
                d,
                blocked,
                in_free
            );
            d = next(d);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Free intervals are sorted, inside the range, and maximal
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_intervals_are_maximal(
        reservations in arb_reservations(),
        (start, end) in arb_query(),
    ) {
        let conflicts = find_conflicts(&reservations, start, end);
        let free = find_free_intervals(conflicts.iter().copied(), start, end);

        for f in &free {
            prop_assert!(f.start_date < f.end_date);
            prop_assert!(f.start_date >= start && f.end_date <= end);
            // Cannot extend left: either at the range start or the day before is blocked.
            let before = f.start_date.pred_opt().unwrap();
            prop_assert!(f.start_date == start || conflicts.iter().any(|r| r.covers(before)));
            // Cannot extend right: either at the range end or the end date is blocked.
            prop_assert!(f.end_date == end || conflicts.iter().any(|r| r.covers(f.end_date)));
        }
        for pair in free.windows(2) {
            prop_assert!(pair[0].end_date < pair[1].start_date);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Interval-merge output equals the day-by-day scan
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn merge_matches_day_scan(
        reservations in arb_reservations(),
        (start, end) in arb_query(),
    ) {
        let conflicts = find_conflicts(&reservations, start, end);
        let merged = find_free_intervals(conflicts.iter().copied(), start, end);
        prop_assert_eq!(merged, day_scan(&conflicts, start, end));
    }
}

// ---------------------------------------------------------------------------
// Property 4: Conflicts are exactly the overlapping reservations
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn conflicts_match_overlap_predicate(
        reservations in arb_reservations(),
        (start, end) in arb_query(),
    ) {
        let conflicts = find_conflicts(&reservations, start, end);
        let expected = reservations
            .iter()
            .filter(|r| r.start < end && r.end > start)
            .count();
        prop_assert_eq!(conflicts.len(), expected);
        for pair in conflicts.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
        }
    }
}
