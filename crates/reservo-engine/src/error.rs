//! Error types for reservo-engine operations.

use thiserror::Error;

/// Coarse classification of a [`ReservoError`], for callers that branch on the
/// kind of failure rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input. Never retried.
    Validation,
    /// The reservation backend failed or returned an unusable payload.
    UpstreamFetch,
    /// Anything else that went wrong while computing an answer.
    Internal,
}

#[derive(Error, Debug)]
pub enum ReservoError {
    #[error("Invalid date format. Use YYYY-MM-DD format. Error: {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Start date must be before end date")]
    InvalidRange { start: String, end: String },

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Upstream fetch failed for {entity_id} {month}: {reason}")]
    UpstreamFetch {
        entity_id: String,
        month: String,
        reason: String,
    },

    #[error("Failed to check availability: {0}")]
    Internal(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReservoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReservoError::InvalidDate { .. }
            | ReservoError::InvalidRange { .. }
            | ReservoError::InvalidArgument(_)
            | ReservoError::Config(_) => ErrorKind::Validation,
            ReservoError::UpstreamFetch { .. } => ErrorKind::UpstreamFetch,
            ReservoError::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReservoError>;
