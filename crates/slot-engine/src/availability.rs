//! End-to-end meeting availability for a group of participants.
//!
//! Accepts N participants' raw busy lists (as fetched from their calendars),
//! converts each into free time within a search window, expands optional
//! working hours over the window's dates, and reduces everything to the ranges
//! at which the meeting can start.
//!
//! Unlike the lower-level operations, this entry point tolerates untidy
//! provider data: each busy list is sorted and merged before conversion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constraints::{self, WeeklyAvailability};
use crate::error::{Result, SlotError};
use crate::freebusy::{self, BusyEvent};
use crate::interval::Interval;
use crate::scheduler::{self, StartRange};

/// One attendee and their busy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque identifier (e.g., an email address), echoed back in the result.
    pub id: String,
    /// Busy events in any order; overlaps are merged.
    #[serde(default)]
    pub busy: Vec<BusyEvent>,
    /// Minimum break, in minutes, kept free before and after each busy event.
    #[serde(default)]
    pub buffer_minutes: u32,
}

impl Participant {
    pub fn new(id: impl Into<String>, busy: Vec<BusyEvent>) -> Self {
        Self {
            id: id.into(),
            busy,
            buffer_minutes: 0,
        }
    }

    #[must_use]
    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.buffer_minutes = minutes;
        self
    }

    /// This participant's free intervals within the window.
    fn free_within(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<Interval>> {
        let busy = freebusy::normalize_busy(&self.busy)?;
        let busy = freebusy::pad_busy(&busy, Duration::minutes(i64::from(self.buffer_minutes)));
        freebusy::busy_to_free(&busy, window_start, window_end)
    }
}

/// Everything needed to find when a group can meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub participants: Vec<Participant>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Weekly hours during which the meeting may take place, applied to every
    /// date the window touches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_hours: Option<WeeklyAvailability>,
    /// Additional dated constraint sequences, each sorted and non-overlapping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<Vec<Interval>>,
}

/// The permissible start ranges for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingAvailability {
    /// Ranges in which the meeting may start, in chronological order.
    pub ranges: Vec<StartRange>,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub duration_minutes: u32,
    /// Participant ids, in request order.
    pub participants: Vec<String>,
    /// Number of constraint sequences applied, working hours included.
    pub constraint_count: usize,
}

/// Find every range in which the requested meeting can start.
///
/// # Errors
/// - [`SlotError::NoParticipants`] if the request has no participants.
/// - [`SlotError::InvalidWindow`] if `window_start > window_end`.
/// - [`SlotError::NonPositiveDuration`] if `duration_minutes` is zero.
/// - [`SlotError::InvalidInterval`] for a busy event ending before it starts.
/// - [`SlotError::InvalidSchedule`] for a malformed constraint sequence.
pub fn find_meeting_times(request: &AvailabilityRequest) -> Result<MeetingAvailability> {
    let (window_start, window_end) = (request.window_start, request.window_end);
    if request.participants.is_empty() {
        return Err(SlotError::NoParticipants);
    }
    if window_start > window_end {
        return Err(SlotError::InvalidWindow {
            start: window_start,
            end: window_end,
        });
    }

    let free = request
        .participants
        .iter()
        .map(|p| p.free_within(window_start, window_end))
        .collect::<Result<Vec<_>>>()?;

    let mut constraints = request.constraints.clone();
    if let Some(hours) = &request.working_hours {
        constraints.push(constraints::expand_constraints(
            hours,
            window_start.date_naive(),
            window_end.date_naive(),
        )?);
    }

    let duration = Duration::minutes(i64::from(request.duration_minutes));
    let ranges = scheduler::schedule(&free, duration, &constraints)?;

    debug!(
        participants = request.participants.len(),
        constraints = constraints.len(),
        ranges = ranges.len(),
        "computed meeting availability"
    );

    Ok(MeetingAvailability {
        ranges,
        window_start,
        window_end,
        duration_minutes: request.duration_minutes,
        participants: request.participants.iter().map(|p| p.id.clone()).collect(),
        constraint_count: constraints.len(),
    })
}
