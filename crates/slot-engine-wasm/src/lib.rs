//! WASM bindings for slot-engine.
//!
//! Exposes busy/free conversion, weekly availability expansion, scheduling, and
//! the end-to-end meeting finder to JavaScript via `wasm-bindgen`. All complex
//! types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use slot_engine::{
    AvailabilityRequest, BusyEvent, Interval, MeetingAvailability, Participant,
    WeeklyAvailability,
};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct IntervalDto {
    start: String,
    end: String,
}

impl From<&Interval> for IntervalDto {
    fn from(iv: &Interval) -> Self {
        Self {
            start: iv.start.to_rfc3339(),
            end: iv.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct MeetingAvailabilityDto {
    ranges: Vec<IntervalDto>,
    window_start: String,
    window_end: String,
    duration_minutes: u32,
    participants: Vec<String>,
    constraint_count: usize,
}

impl From<&MeetingAvailability> for MeetingAvailabilityDto {
    fn from(m: &MeetingAvailability) -> Self {
        Self {
            ranges: m.ranges.iter().map(IntervalDto::from).collect(),
            window_start: m.window_start.to_rfc3339(),
            window_end: m.window_end.to_rfc3339(),
            duration_minutes: m.duration_minutes,
            participants: m.participants.clone(),
            constraint_count: m.constraint_count,
        }
    }
}

/// A `{start, end}` pair passed from JavaScript.
#[derive(Deserialize)]
struct IntervalInput {
    start: String,
    end: String,
}

impl IntervalInput {
    fn parse(&self) -> Result<Interval, JsValue> {
        Ok(Interval {
            start: parse_datetime(&self.start)?,
            end: parse_datetime(&self.end)?,
        })
    }
}

#[derive(Deserialize)]
struct ParticipantInput {
    id: String,
    #[serde(default)]
    busy: Vec<IntervalInput>,
    #[serde(default)]
    buffer_minutes: u32,
}

#[derive(Deserialize)]
struct RequestInput {
    participants: Vec<ParticipantInput>,
    window_start: String,
    window_end: String,
    duration_minutes: u32,
    #[serde(default)]
    working_hours: Option<WeeklyAvailability>,
    #[serde(default)]
    constraints: Vec<Vec<IntervalInput>>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts both RFC 3339 (with offset, e.g., "2026-03-16T09:00:00+01:00") and
/// naive time (e.g., "2026-03-16T09:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, JsValue> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

fn parse_intervals(inputs: &[IntervalInput]) -> Result<Vec<Interval>, JsValue> {
    inputs.iter().map(IntervalInput::parse).collect()
}

fn parse_sequences_json(json: &str, what: &str) -> Result<Vec<Vec<Interval>>, JsValue> {
    let inputs: Vec<Vec<IntervalInput>> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid {} JSON: {}", what, e)))?;
    inputs.iter().map(|seq| parse_intervals(seq)).collect()
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn engine_error(e: slot_engine::SlotError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Convert one participant's busy events into free intervals within a window.
///
/// `busy_json` must be a JSON array of `{start, end}` objects, sorted and
/// non-overlapping. With a non-zero `buffer_minutes`, every event is widened by
/// that much on both sides first. Returns a JSON array of `{start, end}`.
#[wasm_bindgen(js_name = "findFreeIntervals")]
pub fn find_free_intervals(
    busy_json: &str,
    window_start: &str,
    window_end: &str,
    buffer_minutes: Option<u32>,
) -> Result<String, JsValue> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(busy_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid busy JSON: {}", e)))?;
    let busy: Vec<BusyEvent> = parse_intervals(&inputs)?
        .into_iter()
        .map(BusyEvent::from)
        .collect();
    let ws = parse_datetime(window_start)?;
    let we = parse_datetime(window_end)?;

    let free = match buffer_minutes {
        Some(minutes) if minutes > 0 => slot_engine::busy_to_free_with_buffer(
            &busy,
            ws,
            we,
            Duration::minutes(i64::from(minutes)),
        ),
        _ => slot_engine::busy_to_free(&busy, ws, we),
    }
    .map_err(engine_error)?;

    to_json(&free.iter().map(IntervalDto::from).collect::<Vec<_>>())
}

/// Expand weekly availability into dated intervals for every day from
/// `start_date` to `end_date` inclusive (both "YYYY-MM-DD").
///
/// `availability_json` maps weekday names to lists of `["HH:MM", "HH:MM"]`
/// windows, e.g. `{"monday": [["09:00", "17:00"]]}`.
#[wasm_bindgen(js_name = "expandConstraints")]
pub fn expand_constraints(
    availability_json: &str,
    start_date: &str,
    end_date: &str,
) -> Result<String, JsValue> {
    let availability: WeeklyAvailability = serde_json::from_str(availability_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid availability JSON: {}", e)))?;
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;

    let intervals =
        slot_engine::expand_constraints(&availability, start, end).map_err(engine_error)?;

    to_json(&intervals.iter().map(IntervalDto::from).collect::<Vec<_>>())
}

/// Compute the ranges in which a meeting of `duration_minutes` can start.
///
/// `participants_json` and the optional `constraints_json` are JSON arrays of
/// sequences, each an array of `{start, end}` free intervals.
#[wasm_bindgen(js_name = "schedule")]
pub fn schedule(
    participants_json: &str,
    duration_minutes: u32,
    constraints_json: Option<String>,
) -> Result<String, JsValue> {
    let participants = parse_sequences_json(participants_json, "participants")?;
    let constraints = match constraints_json.as_deref() {
        Some(json) => parse_sequences_json(json, "constraints")?,
        None => Vec::new(),
    };

    let ranges = slot_engine::schedule(
        &participants,
        Duration::minutes(i64::from(duration_minutes)),
        &constraints,
    )
    .map_err(engine_error)?;

    to_json(&ranges.iter().map(IntervalDto::from).collect::<Vec<_>>())
}

/// Find when a group can meet, starting from raw busy calendars.
///
/// `request_json` carries `participants` (`{id, busy, buffer_minutes}`),
/// `window_start`, `window_end`, `duration_minutes`, and optionally
/// `working_hours` and `constraints`. Busy lists may be unsorted.
#[wasm_bindgen(js_name = "findMeetingTimes")]
pub fn find_meeting_times(request_json: &str) -> Result<String, JsValue> {
    let input: RequestInput = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;

    let participants = input
        .participants
        .iter()
        .map(|p| {
            let busy = parse_intervals(&p.busy)?
                .into_iter()
                .map(BusyEvent::from)
                .collect();
            Ok(Participant::new(p.id.clone(), busy).with_buffer(p.buffer_minutes))
        })
        .collect::<Result<Vec<_>, JsValue>>()?;
    let constraints = input
        .constraints
        .iter()
        .map(|seq| parse_intervals(seq))
        .collect::<Result<Vec<_>, JsValue>>()?;

    let request = AvailabilityRequest {
        participants,
        window_start: parse_datetime(&input.window_start)?,
        window_end: parse_datetime(&input.window_end)?,
        duration_minutes: input.duration_minutes,
        working_hours: input.working_hours,
        constraints,
    };

    let availability = slot_engine::find_meeting_times(&request).map_err(engine_error)?;

    to_json(&MeetingAvailabilityDto::from(&availability))
}
