//! # slot-engine
//!
//! Interval algebra for finding when a group of people can meet.
//!
//! Given each participant's busy calendar and optional recurring constraints
//! such as working hours, the engine computes every range of instants at which
//! a meeting of a given duration could start. It is pure computation: no I/O,
//! no shared state, no time-zone conversion. All timestamps are UTC.
//!
//! ## Modules
//!
//! - [`interval`]: `Interval` value type and the sorted-sequence invariant
//! - [`freebusy`]: Busy events → free intervals within a window
//! - [`constraints`]: Weekly availability → dated constraint intervals
//! - [`scheduler`]: N free sequences + duration → permissible start ranges
//! - [`availability`]: End-to-end pipeline from raw busy lists to start ranges
//! - [`error`]: Error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use slot_engine::{schedule, Interval};
//!
//! let at = |h| Utc.with_ymd_and_hms(2026, 3, 16, h, 0, 0).unwrap();
//! let alice = vec![Interval::new(at(9), at(10)).unwrap(), Interval::new(at(12), at(13)).unwrap()];
//! let bob = vec![Interval::new(at(9), at(10)).unwrap(), Interval::new(at(13), at(14)).unwrap()];
//!
//! let ranges = schedule(&[alice, bob], Duration::minutes(30), &[]).unwrap();
//! assert_eq!(ranges.len(), 1);
//! assert_eq!(ranges[0].start, at(9));
//! assert_eq!(ranges[0].end, at(9) + Duration::minutes(30));
//! ```

pub mod availability;
pub mod constraints;
pub mod error;
pub mod freebusy;
pub mod interval;
pub mod scheduler;

pub use availability::{find_meeting_times, AvailabilityRequest, MeetingAvailability, Participant};
pub use constraints::{expand_constraints, TimeWindow, WeeklyAvailability};
pub use error::SlotError;
pub use freebusy::{
    busy_to_free, busy_to_free_all, busy_to_free_with_buffer, normalize_busy, BusyEvent,
};
pub use interval::Interval;
pub use scheduler::{intersect_pair, schedule, StartRange};
