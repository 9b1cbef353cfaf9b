//! Multi-way intersection of free-interval sequences.
//!
//! [`schedule`] folds every participant's free sequence, and every constraint
//! sequence, into one accumulator with a two-pointer sweep per step. The
//! windows that survive are common to all sequences and long enough for the
//! meeting; each is then shortened by the meeting duration to give the range of
//! instants at which the meeting may start.
//!
//! Constraint sequences are not special: they are appended to the participants
//! and reduced exactly like them.

use chrono::Duration;
use tracing::{debug, trace};

use crate::error::{Result, SlotError};
use crate::interval::{validate_sequence, Interval};

/// A range of instants at which a meeting may start.
///
/// A meeting starting anywhere in `[start, end]` finishes inside every
/// participant's free time and every constraint window.
pub type StartRange = Interval;

/// Compute the ranges in which a meeting of `duration` can start.
///
/// `participants` holds one free sequence per participant; `constraints` holds
/// extra sequences (working hours and the like) that must also be free. Both
/// are reduced as one list, participants first.
///
/// # Errors
/// - [`SlotError::NoParticipants`] if `participants` is empty, whatever the
///   constraints.
/// - [`SlotError::NonPositiveDuration`] if `duration` is zero or negative.
/// - [`SlotError::InvalidSchedule`] if any sequence is unsorted or overlapping;
///   the reported index counts participants first, then constraints.
pub fn schedule(
    participants: &[Vec<Interval>],
    duration: Duration,
    constraints: &[Vec<Interval>],
) -> Result<Vec<StartRange>> {
    if participants.is_empty() {
        return Err(SlotError::NoParticipants);
    }
    let sequences: Vec<&[Interval]> = participants
        .iter()
        .chain(constraints)
        .map(Vec::as_slice)
        .collect();

    reduce(&sequences, duration)
}

/// Reduce an ordered list of free sequences to the common start ranges.
///
/// This is the routine behind [`schedule`], for callers that already hold
/// borrowed slices.
pub fn reduce(sequences: &[&[Interval]], duration: Duration) -> Result<Vec<StartRange>> {
    if duration <= Duration::zero() {
        return Err(SlotError::NonPositiveDuration {
            seconds: duration.num_seconds(),
        });
    }
    let (first, rest) = sequences.split_first().ok_or(SlotError::NoParticipants)?;
    for (index, sequence) in sequences.iter().enumerate() {
        validate_sequence(sequence, index)?;
    }

    let mut common: Vec<Interval> = first
        .iter()
        .filter(|interval| interval.fits(duration))
        .copied()
        .collect();

    for (offset, sequence) in rest.iter().enumerate() {
        if common.is_empty() {
            break;
        }
        common = intersect_pair(&common, sequence, duration);
        debug!(
            sequence = offset + 1,
            windows = common.len(),
            "intersected free sequence"
        );
    }

    Ok(common
        .into_iter()
        .map(|window| Interval {
            start: window.start,
            end: window.end - duration,
        })
        .collect())
}

/// Intersect two valid sequences, keeping overlaps at least `duration` long.
///
/// Merge-style sweep: after comparing `a[i]` with `b[j]`, the pointer whose
/// interval ends first advances. On equal ends `i` advances.
pub fn intersect_pair(a: &[Interval], b: &[Interval], duration: Duration) -> Vec<Interval> {
    let mut windows = Vec::new();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if let Some(overlap) = a[i].overlap(&b[j]) {
            if overlap.fits(duration) {
                trace!(start = %overlap.start, end = %overlap.end, "qualifying window");
                windows.push(overlap);
            }
        }

        if b[j].end < a[i].end {
            j += 1;
        } else {
            i += 1;
        }
    }

    windows
}
