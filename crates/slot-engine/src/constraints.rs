//! Weekly recurring availability and its expansion into dated intervals.
//!
//! A [`WeeklyAvailability`] holds, for each weekday, the windows during which a
//! meeting may take place (typically working hours). [`expand_constraints`]
//! stamps those windows onto every date of a range, producing an interval
//! sequence the scheduler treats as one more participant.
//!
//! ## Wire format
//!
//! ```json
//! {
//!   "monday":  [["09:00", "17:00"]],
//!   "tuesday": [["09:00", "12:00"], ["13:00", "17:00"]],
//!   "friday":  [["09:00"]]
//! }
//! ```
//!
//! Each window is a list of time values. A window with fewer than two values
//! (after dropping empty strings) is ignored, so `friday` above is unavailable
//! all day, as is every weekday that is not listed. Keys must be lowercase
//! English weekday names; anything else is rejected.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::Interval;

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An open/close pair of wall-clock times within one day, `open < close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl TimeWindow {
    /// # Errors
    /// Returns [`SlotError::InvalidAvailability`] unless `open < close`.
    /// Windows spanning midnight are not supported.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self> {
        if open >= close {
            return Err(SlotError::InvalidAvailability(format!(
                "window opens at {} but closes at {}",
                open.format("%H:%M"),
                close.format("%H:%M")
            )));
        }
        Ok(Self { open, close })
    }

    /// Build a window from a day entry's time values.
    ///
    /// Fewer than two values means no window (`Ok(None)`); more than two is an
    /// error.
    pub fn from_values(values: &[NaiveTime]) -> Result<Option<Self>> {
        match values {
            [] | [_] => Ok(None),
            [open, close] => Self::new(*open, *close).map(Some),
            _ => Err(SlotError::InvalidAvailability(format!(
                "a window takes an open and a close time, got {} values",
                values.len()
            ))),
        }
    }
}

/// Per-weekday availability windows, repeating every week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeek", into = "RawWeek")]
pub struct WeeklyAvailability {
    // Indexed by `Weekday::num_days_from_monday`. Each day's windows are kept
    // sorted and merged.
    days: [Vec<TimeWindow>; 7],
}

impl WeeklyAvailability {
    /// Availability with every day closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from one optional `(open, close)` pair per weekday, Monday first.
    ///
    /// `None` marks the day unavailable.
    pub fn from_days(days: [Option<(NaiveTime, NaiveTime)>; 7]) -> Result<Self> {
        let mut week = Self::new();
        for (weekday, day) in WEEK.iter().zip(days) {
            if let Some((open, close)) = day {
                week = week.with_window(*weekday, TimeWindow::new(open, close)?);
            }
        }
        Ok(week)
    }

    /// The same window Monday through Friday, weekends closed.
    pub fn working_days(window: TimeWindow) -> Self {
        WEEK[..5]
            .iter()
            .fold(Self::new(), |week, day| week.with_window(*day, window))
    }

    /// Add a window to `day`, merging it with any window it overlaps or touches.
    #[must_use]
    pub fn with_window(mut self, day: Weekday, window: TimeWindow) -> Self {
        let windows = &mut self.days[day.num_days_from_monday() as usize];
        windows.push(window);
        merge_windows(windows);
        self
    }

    /// The windows open on `day`, sorted by opening time.
    pub fn windows(&self, day: Weekday) -> &[TimeWindow] {
        &self.days[day.num_days_from_monday() as usize]
    }

    /// `true` when no day has any window.
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Vec::is_empty)
    }
}

fn merge_windows(windows: &mut Vec<TimeWindow>) {
    windows.sort_by_key(|w| (w.open, w.close));
    let mut merged: Vec<TimeWindow> = Vec::with_capacity(windows.len());
    for window in windows.drain(..) {
        match merged.last_mut() {
            Some(last) if window.open <= last.close => last.close = last.close.max(window.close),
            _ => merged.push(window),
        }
    }
    *windows = merged;
}

/// Expand `availability` over every date in `[start, end]`, inclusive.
///
/// For each date, each window of that date's weekday becomes the interval from
/// `date + open` to `date + close` (interpreted as UTC, like every timestamp the
/// engine handles). Output is in calendar order and satisfies the sequence
/// invariant. Days without windows contribute nothing.
///
/// # Errors
/// Returns [`SlotError::InvalidDateRange`] if `start > end`.
pub fn expand_constraints(
    availability: &WeeklyAvailability,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Interval>> {
    if start > end {
        return Err(SlotError::InvalidDateRange { start, end });
    }

    let mut intervals = Vec::new();
    let mut weekday = start.weekday();

    for date in start.iter_days().take_while(|date| *date <= end) {
        for window in availability.windows(weekday) {
            intervals.push(Interval {
                start: date.and_time(window.open).and_utc(),
                end: date.and_time(window.close).and_utc(),
            });
        }
        weekday = weekday.succ();
    }

    debug!(
        %start,
        %end,
        intervals = intervals.len(),
        "expanded weekly availability"
    );

    Ok(intervals)
}

// ---------------------------------------------------------------------------
// Serde representation: weekday name -> list of windows of "HH:MM" strings
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawWeek {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    monday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tuesday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    wednesday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    thursday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    friday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    saturday: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    sunday: Vec<Vec<String>>,
}

impl RawWeek {
    fn into_days(self) -> [Vec<Vec<String>>; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .ok_or_else(|| SlotError::InvalidAvailability(format!("invalid time of day '{}'", value)))
}

impl TryFrom<RawWeek> for WeeklyAvailability {
    type Error = SlotError;

    fn try_from(raw: RawWeek) -> Result<Self> {
        let mut week = WeeklyAvailability::new();
        for (weekday, entries) in WEEK.iter().zip(raw.into_days()) {
            for entry in entries {
                let values = entry
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(parse_time)
                    .collect::<Result<Vec<_>>>()?;
                if let Some(window) = TimeWindow::from_values(&values)? {
                    week = week.with_window(*weekday, window);
                }
            }
        }
        Ok(week)
    }
}

impl From<WeeklyAvailability> for RawWeek {
    fn from(week: WeeklyAvailability) -> Self {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] =
            week.days.map(|windows| {
                windows
                    .iter()
                    .map(|w| {
                        vec![
                            w.open.format("%H:%M").to_string(),
                            w.close.format("%H:%M").to_string(),
                        ]
                    })
                    .collect::<Vec<Vec<String>>>()
            });
        RawWeek {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}
