//! Convert busy events into free intervals within a bounding window.
//!
//! The converter expects busy events sorted by start and non-overlapping, which
//! is what calendar providers return for a single participant once duplicates
//! are removed. Use [`normalize_busy`] first when that is not guaranteed.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::{self, Interval};

/// One blocked period on a participant's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<BusyEvent> for Interval {
    fn from(event: BusyEvent) -> Self {
        Interval {
            start: event.start,
            end: event.end,
        }
    }
}

impl From<Interval> for BusyEvent {
    fn from(interval: Interval) -> Self {
        BusyEvent {
            start: interval.start,
            end: interval.end,
        }
    }
}

/// Compute the free intervals of one participant inside `[window_start, window_end]`.
///
/// Walks the busy events with a cursor starting at `window_start`, emitting the
/// gap before each event. The first event ending after `window_end` stops the
/// walk; such an event is cut at `window_end`, so the part of the window it
/// covers stays busy and free and busy time together tile the window exactly.
///
/// An entirely busy window yields no intervals; a window with no busy events
/// yields the window itself.
///
/// # Errors
/// Returns [`SlotError::InvalidWindow`] if `window_start > window_end`, and
/// [`SlotError::InvalidSchedule`] if the busy events are unsorted, overlapping,
/// or inverted.
pub fn busy_to_free(
    busy: &[BusyEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<Interval>> {
    convert(busy, window_start, window_end, 0)
}

/// Apply [`busy_to_free`] to several participants at once.
///
/// Each schedule is converted independently. An error names the index of the
/// participant whose busy list was rejected.
pub fn busy_to_free_all(
    schedules: &[Vec<BusyEvent>],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Result<Vec<Vec<Interval>>> {
    schedules
        .iter()
        .enumerate()
        .map(|(index, busy)| convert(busy, window_start, window_end, index))
        .collect()
}

/// Like [`busy_to_free`], but keeps `buffer` free before and after every event.
///
/// Padded events that run into each other are merged before conversion, so the
/// busy list only needs to be sorted and non-overlapping before padding.
///
/// # Errors
/// Everything [`busy_to_free`] rejects, plus a negative `buffer`.
pub fn busy_to_free_with_buffer(
    busy: &[BusyEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    buffer: Duration,
) -> Result<Vec<Interval>> {
    if buffer < Duration::zero() {
        return Err(SlotError::NegativeBuffer {
            seconds: buffer.num_seconds(),
        });
    }
    validate_busy(busy, 0)?;

    let padded = pad_busy(busy, buffer);
    convert(&padded, window_start, window_end, 0)
}

/// Sort raw busy events and merge those that overlap or touch.
///
/// # Errors
/// Returns [`SlotError::InvalidInterval`] for an event that ends before it starts.
pub fn normalize_busy(events: &[BusyEvent]) -> Result<Vec<BusyEvent>> {
    let intervals = events
        .iter()
        .map(|e| Interval::new(e.start, e.end))
        .collect::<Result<Vec<_>>>()?;

    Ok(interval::merge_overlapping(intervals)
        .into_iter()
        .map(BusyEvent::from)
        .collect())
}

/// Widen every event by `buffer` on both sides and merge the result.
///
/// Padding saturates at the ends of the representable timestamp range.
pub(crate) fn pad_busy(busy: &[BusyEvent], buffer: Duration) -> Vec<BusyEvent> {
    let padded: Vec<Interval> = busy
        .iter()
        .map(|e| Interval {
            start: e
                .start
                .checked_sub_signed(buffer)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end: e
                .end
                .checked_add_signed(buffer)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
        .collect();

    interval::merge_overlapping(padded)
        .into_iter()
        .map(BusyEvent::from)
        .collect()
}

fn convert(
    busy: &[BusyEvent],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    sequence: usize,
) -> Result<Vec<Interval>> {
    if window_start > window_end {
        return Err(SlotError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }
    validate_busy(busy, sequence)?;

    let mut free = Vec::new();
    let mut begin = window_start;

    for event in busy {
        if event.end > window_end {
            // Sorted and non-overlapping: every later event ends past the window too.
            if event.start < window_end {
                if begin < event.start {
                    free.push(Interval {
                        start: begin,
                        end: event.start,
                    });
                }
                begin = window_end;
            }
            break;
        }
        if begin < event.start {
            free.push(Interval {
                start: begin,
                end: event.start,
            });
        }
        begin = begin.max(event.end);
    }

    // Trailing free interval after the last busy event.
    if begin < window_end {
        free.push(Interval {
            start: begin,
            end: window_end,
        });
    }

    debug!(
        sequence,
        busy = busy.len(),
        free = free.len(),
        "converted busy events to free intervals"
    );

    Ok(free)
}

fn validate_busy(busy: &[BusyEvent], sequence: usize) -> Result<()> {
    let invalid = |position: usize, reason: &str| SlotError::InvalidSchedule {
        sequence,
        position,
        reason: reason.to_string(),
    };

    for (position, event) in busy.iter().enumerate() {
        if event.start > event.end {
            return Err(invalid(position, "busy event ends before it starts"));
        }
        if let Some(previous) = position.checked_sub(1).map(|p| &busy[p]) {
            if event.start < previous.start {
                return Err(invalid(position, "busy events are not sorted by start"));
            }
            if event.start < previous.end {
                return Err(invalid(position, "busy event overlaps the previous one"));
            }
        }
    }

    Ok(())
}
