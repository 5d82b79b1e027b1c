use serde::Serialize;
use thiserror::Error;

/// Run-level configuration problems. Raised before any record is read.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
pub enum ConfigError {
    #[error("window size must be a positive integer, got {0}")]
    InvalidWindowSize(usize),

    #[error("worker count must be between 1 and {max}, got {count}")]
    InvalidWorkerCount { count: usize, max: usize },

    #[error("threshold must be a finite quality in [0, 1], got {0}")]
    InvalidThreshold(f64),

    #[error("in-flight window ({in_flight}) must be at least the worker count ({workers})")]
    InvalidInFlight { in_flight: usize, workers: usize },

    #[error("in-flight window ({in_flight}) exceeds the limit of {max} records")]
    InFlightTooLarge { in_flight: usize, max: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("{bases} bases but {qualities} quality scores")]
    LengthMismatch { bases: usize, qualities: usize },

    #[error("quality score at position {position} is not a value in [0, 1]")]
    InvalidQuality { position: usize },

    #[error("invalid mask annotation: {reason}")]
    InvalidMask { reason: String },
}

/// A single malformed record. The run continues past it.
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[error("record {index} ({id}) rejected: {reason}")]
pub struct RecordRejection {
    pub index: u64,
    pub id: String,
    pub reason: RejectionReason,
}

impl RecordRejection {
    pub fn new(index: u64, id: &str, reason: RejectionReason) -> Self {
        Self {
            index,
            id: id.to_string(),
            reason,
        }
    }
}
