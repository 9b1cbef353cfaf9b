//! Error types for slot-engine operations.
//!
//! Every variant is a precondition violation local to a single call. The engine
//! performs no I/O, so nothing here is environmental or retryable as-is.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid interval: start {start} is after end {end}")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A sequence broke the sorted, non-overlapping invariant.
    ///
    /// `sequence` is the index of the offending sequence in the caller's input
    /// (participants first, then constraints); `position` is the index of the
    /// first interval found out of order.
    #[error("Invalid schedule {sequence} at position {position}: {reason}")]
    InvalidSchedule {
        sequence: usize,
        position: usize,
        reason: String,
    },

    #[error("No participants: at least one schedule is required")]
    NoParticipants,

    #[error("Meeting duration must be positive, got {seconds}s")]
    NonPositiveDuration { seconds: i64 },

    #[error("Break buffer must not be negative, got {seconds}s")]
    NegativeBuffer { seconds: i64 },

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid availability: {0}")]
    InvalidAvailability(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
