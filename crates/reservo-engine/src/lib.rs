//! # reservo-engine
//!
//! Date-level availability for bookable entities (rooms, resources, slots).
//!
//! Given the reservations of one entity, the engine answers two questions:
//! whether a single date is free, and, for a date range, which reservations
//! conflict and which maximal sub-intervals are free. All intervals are
//! half-open `[start, end)` calendar-date intervals: a reservation's end date
//! is free.
//!
//! ## Modules
//!
//! - [`calendar`] — `YYYY-MM-DD` parsing, timestamp reduction, month coverage
//! - [`reservation`] — raw wire records and normalized date intervals
//! - [`source`] — the fetch-collaborator trait and an in-memory backend
//! - [`http`] — HTTP backend built from [`EngineConfig`]
//! - [`store`] — per-query snapshot fetched across covering months
//! - [`conflict`] — reservations intersecting a query range
//! - [`freebusy`] — free-interval decomposition of a query range
//! - [`availability`] — the engine: single-date and range checks
//! - [`tools`] — JSON request/response shapes for tool callers
//! - [`config`] — engine configuration
//! - [`error`] — Error types

pub mod availability;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod http;
pub mod reservation;
pub mod source;
pub mod store;
pub mod tools;

pub use availability::{AvailabilityEngine, DateAvailability, RangeAvailability};
pub use calendar::{covering_months, parse_date, YearMonth};
pub use config::EngineConfig;
pub use conflict::find_conflicts;
pub use error::{ErrorKind, ReservoError};
pub use freebusy::{find_free_intervals, FreeInterval};
pub use http::HttpSource;
pub use reservation::{ConflictRecord, RawReservation, Reservation};
pub use source::{InMemorySource, ReservationSource};
pub use store::IntervalStore;
pub use tools::ToolResponse;
