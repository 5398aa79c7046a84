//! Error types for the regime engine.
//!
//! Every failure inside the engine is a typed `Result`; the public entry
//! points collapse them into `Option` at the boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Invalid raw series handed to [`crate::models::Signal::new`].
#[derive(Debug, Error, PartialEq)]
pub enum SignalError {
    #[error("observation dates must be strictly increasing ({previous} then {next})")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },
}

/// Failure reading or writing an external store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("questdb error: {0}")]
    Postgres(#[from] tokio_postgres::Error),

    #[error("invalid signal data: {0}")]
    Signal(#[from] SignalError),
}

/// Reasons the statistical classifier declines to classify.
#[derive(Debug, Error, PartialEq)]
pub enum ClusterError {
    #[error("not enough observations: {got} < {required}")]
    InsufficientHistory { got: usize, required: usize },

    #[error("not enough usable feature columns: {0}")]
    InsufficientFeatures(usize),

    #[error("only {distinct} distinct points for {k} clusters")]
    DegenerateData { distinct: usize, k: usize },

    #[error("feature matrix contains non-finite values")]
    NonFinite,

    #[error("rows have inconsistent widths")]
    RaggedMatrix,
}

/// Why an update cycle produced no record.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no usable signals available")]
    NoUsableSignals,

    #[error("failed to persist regime record: {0}")]
    Cache(#[source] StoreError),
}

#[derive(Debug, Error)]
#[error("invalid cron expression '{expression}': {reason}")]
pub struct ScheduleError {
    pub expression: String,
    pub reason: String,
}
