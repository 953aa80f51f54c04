//! Tests for loading and normalizing reservations across covering months.

use chrono::NaiveDate;
use reservo_engine::{InMemorySource, IntervalStore, RawReservation, YearMonth};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn raw(id: &str, start: &str, end: &str) -> RawReservation {
    RawReservation {
        reservation_id: id.to_string(),
        booked_by: "guest".to_string(),
        start_date: format!("{}T00:00:00.000Z", start),
        end_date: format!("{}T00:00:00.000Z", end),
        created_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

#[tokio::test]
async fn each_covering_month_fetched_exactly_once() {
    let source = InMemorySource::new();
    let store = IntervalStore::load(&source, "room-1", d("2024-01-15"), d("2024-04-10")).await;

    assert_eq!(store.months().len(), 4);
    for month in 1..=4 {
        assert_eq!(source.calls("room-1", YearMonth::new(2024, month)), 1);
    }
    assert_eq!(source.total_calls(), 4);
}

#[tokio::test]
async fn range_ending_on_month_boundary_skips_next_month() {
    let source = InMemorySource::new();
    IntervalStore::load(&source, "room-1", d("2024-03-10"), d("2024-04-01")).await;

    assert_eq!(source.calls("room-1", YearMonth::new(2024, 3)), 1);
    assert_eq!(source.calls("room-1", YearMonth::new(2024, 4)), 0);
}

#[tokio::test]
async fn reservation_from_previous_month_is_loaded() {
    let source =
        InMemorySource::new().with_reservation("room-1", raw("1", "2024-02-27", "2024-03-03"));
    let store = IntervalStore::load(&source, "room-1", d("2024-03-01"), d("2024-03-10")).await;

    assert_eq!(store.reservations().len(), 1);
    assert_eq!(store.reservations()[0].start, d("2024-02-27"));
    assert_eq!(store.reservations()[0].end, d("2024-03-03"));
}

#[tokio::test]
async fn reservation_returned_by_two_months_kept_once() {
    let source =
        InMemorySource::new().with_reservation("room-1", raw("1", "2024-03-28", "2024-04-03"));
    let store = IntervalStore::load(&source, "room-1", d("2024-03-20"), d("2024-04-20")).await;

    assert_eq!(source.total_calls(), 2);
    assert_eq!(store.reservations().len(), 1);
}

#[tokio::test]
async fn same_id_with_different_interval_kept_twice() {
    let source = InMemorySource::new()
        .with_reservation("room-1", raw("1", "2024-03-02", "2024-03-04"))
        .with_reservation("room-1", raw("1", "2024-03-08", "2024-03-09"));
    let store = IntervalStore::load(&source, "room-1", d("2024-03-01"), d("2024-03-31")).await;

    assert_eq!(store.reservations().len(), 2);
}

#[tokio::test]
async fn failed_month_degrades_to_empty() {
    let mut source = InMemorySource::new()
        .with_reservation("room-1", raw("feb", "2024-02-10", "2024-02-12"))
        .with_reservation("room-1", raw("mar", "2024-03-10", "2024-03-12"));
    source.fail_month("room-1", YearMonth::new(2024, 2));

    let store = IntervalStore::load(&source, "room-1", d("2024-02-01"), d("2024-03-31")).await;

    assert!(store.is_partial());
    assert_eq!(store.degraded_months(), &[YearMonth::new(2024, 2)]);
    let ids: Vec<&str> = store.reservations().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["mar"], "sibling month still loads");
}

#[tokio::test]
async fn degenerate_records_skipped() {
    let source = InMemorySource::new()
        .with_reservation("room-1", raw("zero", "2024-03-05", "2024-03-05"))
        .with_reservation("room-1", raw("inverted", "2024-03-10", "2024-03-05"))
        .with_reservation("room-1", raw("ok", "2024-03-12", "2024-03-14"));

    let store = IntervalStore::load(&source, "room-1", d("2024-03-01"), d("2024-03-31")).await;

    let ids: Vec<&str> = store.reservations().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ok"]);
    assert!(!store.is_partial());
}

#[tokio::test]
async fn unreadable_record_marks_month_degraded() {
    let mut broken = raw("broken", "2024-03-05", "2024-03-06");
    broken.end_date = "someday".to_string();
    let source = InMemorySource::new()
        .with_reservation("room-1", broken)
        .with_reservation("room-1", raw("ok", "2024-03-12", "2024-03-14"));

    let store = IntervalStore::load(&source, "room-1", d("2024-03-01"), d("2024-03-31")).await;

    let ids: Vec<&str> = store.reservations().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["ok"], "readable records in the month still load");
    assert_eq!(store.degraded_months(), &[YearMonth::new(2024, 3)]);
}

#[tokio::test]
async fn space_separated_timestamps_are_loaded() {
    let mut record = raw("1", "2024-03-05", "2024-03-10");
    record.start_date = "2024-03-05 00:00:00".to_string();
    record.end_date = "2024-03-10 00:00:00".to_string();
    let source = InMemorySource::new().with_reservation("room-1", record);

    let store = IntervalStore::load(&source, "room-1", d("2024-03-01"), d("2024-03-31")).await;

    assert_eq!(store.reservations().len(), 1);
    assert_eq!(store.reservations()[0].start, d("2024-03-05"));
    assert_eq!(store.reservations()[0].end, d("2024-03-10"));
    assert!(!store.is_partial());
}

#[tokio::test]
async fn entities_are_isolated() {
    let source = InMemorySource::new()
        .with_reservation("room-1", raw("1", "2024-03-05", "2024-03-10"))
        .with_reservation("room-2", raw("2", "2024-03-05", "2024-03-10"));
    let store = IntervalStore::load(&source, "room-2", d("2024-03-01"), d("2024-03-31")).await;

    assert_eq!(store.reservations().len(), 1);
    assert_eq!(store.reservations()[0].id, "2");
}

#[tokio::test]
async fn fixture_accepts_numeric_ids() {
    let json = r#"{
        "7": [
            {"reservationId": 42, "bookedBy": "Ana", "startDate": "2024-03-05T00:00:00.000Z",
             "endDate": "2024-03-10T00:00:00.000Z", "createdAt": "2024-02-01T09:00:00.000Z"}
        ]
    }"#;
    let source = InMemorySource::from_json(json).unwrap();
    let store = IntervalStore::load(&source, "7", d("2024-03-01"), d("2024-03-31")).await;
    assert_eq!(store.reservations()[0].id, "42");
    assert_eq!(store.reservations()[0].booked_by, "Ana");
}

#[test]
fn malformed_fixture_is_a_config_error() {
    let err = InMemorySource::from_json("[1, 2, 3]").unwrap_err();
    assert_eq!(err.kind(), reservo_engine::ErrorKind::Validation);
}

