//! The [`Interval`] value type and the sequence invariant shared by every stage.
//!
//! An interval sequence is valid when it is sorted by start, no interval ends
//! before it starts, and each interval ends at or before the next one starts.
//! The converter and expander produce such sequences; the scheduler checks
//! them at its boundary with [`validate_sequence`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// A span of time between two instants, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    /// Build an interval, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(SlotError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Length of the interval.
    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    /// The common part of two intervals, `(max(starts), min(ends))`.
    ///
    /// Returns `None` when the intervals are disjoint. Intervals that only touch
    /// produce a zero-length overlap.
    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Interval { start, end })
    }

    /// Whether a meeting of `duration` fits inside this interval.
    ///
    /// A duration that would overflow the timestamp range never fits.
    pub fn fits(&self, duration: Duration) -> bool {
        self.start
            .checked_add_signed(duration)
            .is_some_and(|end| end <= self.end)
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Check that `intervals` satisfies the sequence invariant.
///
/// `sequence` is echoed back in the error so callers passing many sequences can
/// tell which one was rejected.
///
/// # Errors
/// Returns [`SlotError::InvalidSchedule`] on the first interval that ends before
/// it starts, starts at or before its predecessor's start, or begins before its
/// predecessor ends.
pub fn validate_sequence(intervals: &[Interval], sequence: usize) -> Result<()> {
    let invalid = |position: usize, reason: &str| SlotError::InvalidSchedule {
        sequence,
        position,
        reason: reason.to_string(),
    };

    for (position, interval) in intervals.iter().enumerate() {
        if interval.start > interval.end {
            return Err(invalid(position, "interval ends before it starts"));
        }
        if position == 0 {
            continue;
        }
        let previous = &intervals[position - 1];
        if interval.start <= previous.start {
            return Err(invalid(position, "intervals are not sorted by start"));
        }
        if interval.start < previous.end {
            return Err(invalid(position, "interval overlaps the previous one"));
        }
    }

    Ok(())
}

/// Sort intervals and merge any that overlap or touch.
///
/// The result always satisfies the sequence invariant.
pub fn merge_overlapping(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|iv| (iv.start, iv.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

