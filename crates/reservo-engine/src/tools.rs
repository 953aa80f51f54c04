//! Tool-facing request/response layer.
//!
//! Accepts `YYYY-MM-DD` strings, runs the engine, and shapes the answer as the
//! JSON objects tool callers consume. Failures never escape as `Err`; they come
//! back as `{"error": "..."}`.
//!
//! Dates in responses (`date`, `requested_period`, messages) are the parsed
//! dates re-rendered as `YYYY-MM-DD`, not the caller's raw strings: `2024-3-5`
//! comes back as `2024-03-05`.

use serde::Serialize;
use serde_json::Value;

use crate::availability::{AvailabilityEngine, DateAvailability, RangeAvailability};
use crate::calendar::{format_date, parse_date};
use crate::error::{Result, ReservoError};
use crate::freebusy::FreeInterval;
use crate::reservation::ConflictRecord;
use crate::source::ReservationSource;

pub const CHECK_DATE_TOOL: &str = "check_date_availability";
pub const CHECK_RANGE_TOOL: &str = "check_date_range_availability";

/// Every tool name [`dispatch`] understands.
pub const TOOL_NAMES: [&str; 2] = [CHECK_DATE_TOOL, CHECK_RANGE_TOOL];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleDateResponse {
    pub available: bool,
    pub date: String,
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<ConflictRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestedPeriod {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeResponse {
    pub available: bool,
    pub entity_id: String,
    pub requested_period: RequestedPeriod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<ConflictRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_periods: Option<Vec<FreeInterval>>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolResponse {
    SingleDate(SingleDateResponse),
    Range(RangeResponse),
    Error(ErrorResponse),
}

impl ToolResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResponse::Error(_))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "error": format!("Failed to check availability: {}", e) })
        })
    }
}

impl From<ReservoError> for ToolResponse {
    fn from(e: ReservoError) -> Self {
        ToolResponse::Error(ErrorResponse {
            error: e.to_string(),
        })
    }
}

impl From<DateAvailability> for SingleDateResponse {
    fn from(a: DateAvailability) -> Self {
        let date = format_date(a.date);
        let message = a
            .available
            .then(|| format!("Entity {} is available on {}", a.entity_id, date));
        Self {
            available: a.available,
            date,
            entity_id: a.entity_id,
            reservation: a.reservation,
            message,
        }
    }
}

impl From<RangeAvailability> for RangeResponse {
    fn from(a: RangeAvailability) -> Self {
        let requested_period = RequestedPeriod {
            start_date: format_date(a.start),
            end_date: format_date(a.end),
        };
        if a.available {
            let message = format!(
                "Entity {} is completely available from {} to {}",
                a.entity_id, requested_period.start_date, requested_period.end_date
            );
            return Self {
                available: true,
                entity_id: a.entity_id,
                requested_period,
                conflicts: None,
                available_periods: None,
                message,
            };
        }
        let message = format!(
            "Entity {} has {} conflicting reservation(s) in the requested period",
            a.entity_id,
            a.conflicts.len()
        );
        Self {
            available: false,
            entity_id: a.entity_id,
            requested_period,
            conflicts: Some(a.conflicts),
            available_periods: Some(a.available_periods.unwrap_or_default()),
            message,
        }
    }
}

/// `check_date_availability(entity_id, date)`.
pub async fn check_date_availability<S: ReservationSource>(
    engine: &AvailabilityEngine<S>,
    entity_id: &str,
    date: &str,
) -> ToolResponse {
    let result = match parse_date(date) {
        Ok(date) => engine.check_date(entity_id, date).await,
        Err(e) => Err(e),
    };
    result.map_or_else(ToolResponse::from, |a| ToolResponse::SingleDate(a.into()))
}

/// `check_date_range_availability(entity_id, start_date, end_date)`.
pub async fn check_date_range_availability<S: ReservationSource>(
    engine: &AvailabilityEngine<S>,
    entity_id: &str,
    start_date: &str,
    end_date: &str,
) -> ToolResponse {
    let range = parse_date(start_date).and_then(|s| parse_date(end_date).map(|e| (s, e)));
    let result = match range {
        Ok((start, end)) => engine.check_range(entity_id, start, end).await,
        Err(e) => Err(e),
    };
    result.map_or_else(ToolResponse::from, |a| ToolResponse::Range(a.into()))
}

/// Route a tool call by name with JSON object arguments.
///
/// `entity_id` may be omitted, in which case `default_entity_id` is used.
pub async fn dispatch<S: ReservationSource>(
    engine: &AvailabilityEngine<S>,
    tool: &str,
    args: &Value,
    default_entity_id: &str,
) -> ToolResponse {
    let entity_id = match entity_arg(args) {
        Ok(id) => id.unwrap_or_else(|| default_entity_id.to_string()),
        Err(e) => return e.into(),
    };

    match tool {
        CHECK_DATE_TOOL => match required_str(args, "date") {
            Ok(date) => check_date_availability(engine, &entity_id, date).await,
            Err(e) => e.into(),
        },
        CHECK_RANGE_TOOL => {
            let dates = required_str(args, "start_date")
                .and_then(|s| required_str(args, "end_date").map(|e| (s, e)));
            match dates {
                Ok((start, end)) => {
                    check_date_range_availability(engine, &entity_id, start, end).await
                }
                Err(e) => e.into(),
            }
        }
        other => ReservoError::InvalidArgument(format!(
            "Unknown tool: '{}'. Available tools: {}",
            other,
            TOOL_NAMES.join(", ")
        ))
        .into(),
    }
}

/// Entity ids are opaque; numeric ids are accepted and used as written.
fn entity_arg(args: &Value) -> Result<Option<String>> {
    match args.get("entity_id") {
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        _ => Ok(optional_str(args, "entity_id")?.map(str::to_string)),
    }
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(ReservoError::InvalidArgument(format!(
            "'{}' must be a string, got {}",
            key, other
        ))),
    }
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    optional_str(args, key)?.ok_or_else(|| {
        ReservoError::InvalidArgument(format!("Missing required argument: {}", key))
    })
}
