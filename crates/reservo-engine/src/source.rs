//! The fetch collaborator: where raw reservations come from.
//!
//! The engine only ever asks for one entity's reservations in one calendar
//! month. [`HttpSource`](crate::http::HttpSource) talks to the real backend;
//! [`InMemorySource`] serves canned data for tests and offline runs.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::calendar::{parse_timestamp, YearMonth};
use crate::error::{Result, ReservoError};
use crate::reservation::RawReservation;

/// Supplies the raw reservations of one entity for one calendar month.
///
/// Implementations report failures as `ReservoError::UpstreamFetch`; deciding
/// what a failed month means is left to the
/// [`IntervalStore`](crate::store::IntervalStore).
#[async_trait]
pub trait ReservationSource: Send + Sync {
    async fn fetch_month(&self, entity_id: &str, month: YearMonth) -> Result<Vec<RawReservation>>;
}

#[async_trait]
impl<S: ReservationSource + ?Sized> ReservationSource for std::sync::Arc<S> {
    async fn fetch_month(&self, entity_id: &str, month: YearMonth) -> Result<Vec<RawReservation>> {
        (**self).fetch_month(entity_id, month).await
    }
}

/// Deterministic in-memory backend.
///
/// A month query returns every record of the entity whose date interval
/// touches that month, in insertion order, the way a month-scoped backend
/// query would. Records with unreadable timestamps are returned for every
/// month so that callers see them and can reject them.
#[derive(Debug, Default)]
pub struct InMemorySource {
    records: BTreeMap<String, Vec<RawReservation>>,
    failing: HashSet<(String, YearMonth)>,
    calls: Mutex<HashMap<(String, YearMonth), usize>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture of the form `{ "<entity id>": [RawReservation, ...] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: BTreeMap<String, Vec<RawReservation>> = serde_json::from_str(json)
            .map_err(|e| ReservoError::Config(format!("invalid reservation fixture: {}", e)))?;
        Ok(Self {
            records,
            ..Self::default()
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReservoError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, entity_id: &str, record: RawReservation) {
        self.records
            .entry(entity_id.to_string())
            .or_default()
            .push(record);
    }

    pub fn with_reservation(mut self, entity_id: &str, record: RawReservation) -> Self {
        self.insert(entity_id, record);
        self
    }

    /// Make every fetch of `(entity_id, month)` fail.
    pub fn fail_month(&mut self, entity_id: &str, month: YearMonth) {
        self.failing.insert((entity_id.to_string(), month));
    }

    /// How many times `(entity_id, month)` has been fetched.
    pub fn calls(&self, entity_id: &str, month: YearMonth) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls
            .get(&(entity_id.to_string(), month))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.values().sum()
    }
}

#[async_trait]
impl ReservationSource for InMemorySource {
    async fn fetch_month(&self, entity_id: &str, month: YearMonth) -> Result<Vec<RawReservation>> {
        let key = (entity_id.to_string(), month);
        {
            let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
            *calls.entry(key.clone()).or_insert(0) += 1;
        }

        if self.failing.contains(&key) {
            return Err(ReservoError::UpstreamFetch {
                entity_id: entity_id.to_string(),
                month: month.to_string(),
                reason: "injected failure".to_string(),
            });
        }

        let Some(records) = self.records.get(entity_id) else {
            return Ok(Vec::new());
        };

        Ok(records
            .iter()
            .filter(|r| {
                match (parse_timestamp(&r.start_date), parse_timestamp(&r.end_date)) {
                    (Some(start), Some(end)) => month.intersects(start, end),
                    _ => true,
                }
            })
            .cloned()
            .collect())
    }
}
