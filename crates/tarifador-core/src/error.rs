//! Unified error handling for Tarifador
//!
//! All errors in the billing core are converted to this type. The taxonomy
//! separates programming errors in the contract/bill lifecycle (fatal to the
//! affected line), violated replay preconditions (fatal to the whole replay),
//! and per-event data-quality issues (recoverable, skip and warn).

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::BillingPeriod;

/// Main billing error type
#[derive(Error, Debug)]
pub enum BillingError {
    // ==================== Lifecycle Errors ====================
    /// Contract or bill lifecycle misuse. A programming error, not
    /// user-recoverable; processing of the affected line stops.
    #[error("invalid contract state: {0}")]
    InvalidState(String),

    /// Attempted mutation of a finalized bill.
    #[error("bill for {0} is finalized and cannot be modified")]
    FinalizedBill(BillingPeriod),

    // ==================== Replay Errors ====================
    /// Event stream violated the monotonic-timestamp precondition. Aborts
    /// the whole replay: bill math downstream depends on monotonic time.
    #[error("event at {current} is earlier than previously processed event at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        current: DateTime<Utc>,
    },

    /// Event references a line number not present in the replay context.
    #[error("unknown line number: {0}")]
    UnknownLine(String),

    // ==================== Input Errors ====================
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("configuration error: {0}")]
    Config(String),
}

// ==================== From implementations ====================

impl From<serde_json::Error> for BillingError {
    fn from(err: serde_json::Error) -> Self {
        BillingError::Dataset(err.to_string())
    }
}

impl From<std::io::Error> for BillingError {
    fn from(err: std::io::Error) -> Self {
        BillingError::Dataset(err.to_string())
    }
}

impl From<config::ConfigError> for BillingError {
    fn from(err: config::ConfigError) -> Self {
        BillingError::Config(err.to_string())
    }
}
