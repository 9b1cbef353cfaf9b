//! Tests for the multi-way scheduler.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use slot_engine::constraints::{expand_constraints, TimeWindow, WeeklyAvailability};
use slot_engine::scheduler::{intersect_pair, reduce, schedule};
use slot_engine::{Interval, SlotError};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// 2020-10-14 (day 14, a Wednesday) and 2020-10-15 (day 15).
fn at(day: u32, hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 10, day, hour, min, 0).unwrap()
}

/// An interval on `day` starting at `hour:min` and lasting `minutes`.
fn slot(day: u32, hour: u32, min: u32, minutes: i64) -> Interval {
    let start = at(day, hour, min);
    Interval {
        start,
        end: start + Duration::minutes(minutes),
    }
}

fn half_hour() -> Duration {
    Duration::minutes(30)
}

/// Free one hour at 09, 12, 15, 18 and 21 o'clock.
fn every_three_hours(day: u32) -> Vec<Interval> {
    (0..5).map(|x| slot(day, 9 + 3 * x, 0, 60)).collect()
}

/// Free one hour at 09, 13, 17 and 21 o'clock.
fn every_four_hours(day: u32) -> Vec<Interval> {
    (0..4).map(|x| slot(day, 9 + 4 * x, 0, 60)).collect()
}

fn alice() -> Vec<Interval> {
    vec![slot(14, 9, 0, 60), slot(14, 12, 0, 60), slot(14, 21, 0, 60)]
}

fn bob() -> Vec<Interval> {
    vec![slot(14, 9, 0, 60), slot(14, 13, 0, 60), slot(14, 21, 0, 60)]
}

// ── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn two_participants_half_hour_meeting() {
    let ranges = schedule(&[alice(), bob()], half_hour(), &[]).unwrap();

    // Meeting may start anywhere in 09:00-09:30 or 21:00-21:30.
    assert_eq!(ranges, vec![slot(14, 9, 0, 30), slot(14, 21, 0, 30)]);
}

#[test]
fn working_hours_constraint_removes_evening_window() {
    let working = vec![Interval {
        start: at(14, 9, 0),
        end: at(14, 19, 0),
    }];

    let ranges = schedule(&[alice(), bob()], half_hour(), &[working]).unwrap();

    assert_eq!(ranges, vec![slot(14, 9, 0, 30)]);
}

#[test]
fn disjoint_participants_have_no_common_time() {
    let early = vec![slot(14, 9, 0, 60)];
    let late = vec![slot(14, 14, 0, 60)];

    let ranges = schedule(&[early, late], half_hour(), &[]).unwrap();
    assert!(ranges.is_empty());
}

#[test]
fn overlap_shorter_than_duration_does_not_qualify() {
    // Common time 09:30-10:00 is only 30 minutes; a 45-minute meeting won't fit.
    let a = vec![slot(14, 9, 0, 60)];
    let b = vec![slot(14, 9, 30, 60)];

    assert!(schedule(&[a.clone(), b.clone()], Duration::minutes(45), &[])
        .unwrap()
        .is_empty());
    assert_eq!(
        schedule(&[a, b], half_hour(), &[]).unwrap(),
        vec![slot(14, 9, 30, 0)],
        "an exact fit leaves a single permissible instant"
    );
}

#[test]
fn exact_hour_windows_give_single_instants() {
    let ranges = schedule(
        &[every_three_hours(14), every_four_hours(14)],
        Duration::hours(1),
        &[],
    )
    .unwrap();

    assert_eq!(ranges, vec![slot(14, 9, 0, 0), slot(14, 21, 0, 0)]);
}

#[test]
fn three_participants() {
    let third = vec![slot(14, 9, 0, 30), slot(14, 15, 0, 390)];

    let ranges = schedule(
        &[every_three_hours(14), every_four_hours(14), third],
        half_hour(),
        &[],
    )
    .unwrap();

    assert_eq!(ranges, vec![slot(14, 9, 0, 0), slot(14, 21, 0, 0)]);
}

#[test]
fn intersection_over_two_days() {
    let mut first = every_three_hours(14);
    first.extend(every_three_hours(15));
    let second = every_four_hours(15);
    let third = vec![
        slot(14, 9, 0, 30),
        slot(14, 15, 0, 390),
        slot(15, 10, 0, 30),
        slot(15, 15, 0, 390),
    ];

    let ranges = schedule(&[first, second, third], half_hour(), &[]).unwrap();

    assert_eq!(ranges, vec![slot(15, 21, 0, 0)]);
}

#[test]
fn expanded_working_hours_act_as_a_participant() {
    let hours = WeeklyAvailability::working_days(
        TimeWindow::new(
            NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        )
        .unwrap(),
    );
    let constraint = expand_constraints(
        &hours,
        NaiveDate::from_ymd_opt(2020, 10, 14).unwrap(),
        NaiveDate::from_ymd_opt(2020, 10, 15).unwrap(),
    )
    .unwrap();

    let ranges = schedule(
        &[every_three_hours(14), every_four_hours(14)],
        half_hour(),
        &[constraint],
    )
    .unwrap();

    assert_eq!(ranges, vec![slot(14, 9, 0, 30)]);
}

// ── Single participant and reduction shape ──────────────────────────────────

#[test]
fn single_participant_ranges_are_shortened_windows() {
    let free = vec![slot(14, 9, 0, 120), slot(14, 13, 0, 20), slot(14, 15, 0, 30)];

    let ranges = schedule(&[free], half_hour(), &[]).unwrap();

    // The 20-minute window is too short and drops out.
    assert_eq!(ranges, vec![slot(14, 9, 0, 90), slot(14, 15, 0, 0)]);
}

#[test]
fn constraints_are_reduced_like_participants() {
    let working = vec![Interval {
        start: at(14, 9, 0),
        end: at(14, 19, 0),
    }];

    let as_constraint = schedule(&[alice(), bob()], half_hour(), &[working.clone()]).unwrap();
    let as_participant = schedule(&[alice(), bob(), working], half_hour(), &[]).unwrap();

    assert_eq!(as_constraint, as_participant);
}

#[test]
fn constraints_without_participants_are_rejected() {
    let working = vec![Interval {
        start: at(14, 9, 0),
        end: at(14, 10, 0),
    }];
    let err = schedule(&[], half_hour(), &[working]).unwrap_err();
    assert_eq!(err, SlotError::NoParticipants);
}

#[test]
fn reduce_accepts_borrowed_slices() {
    let a = alice();
    let b = bob();
    let ranges = reduce(&[a.as_slice(), b.as_slice()], half_hour()).unwrap();
    assert_eq!(ranges.len(), 2);
}

#[test]
fn participant_with_no_free_time_empties_result() {
    let ranges = schedule(&[alice(), Vec::new(), bob()], half_hour(), &[]).unwrap();
    assert!(ranges.is_empty());
}

// ── Pairwise sweep ──────────────────────────────────────────────────────────

#[test]
fn intersect_pair_returns_raw_windows() {
    let windows = intersect_pair(&alice(), &bob(), half_hour());
    assert_eq!(windows, vec![slot(14, 9, 0, 60), slot(14, 21, 0, 60)]);
}

#[test]
fn intersect_pair_with_equal_ends_keeps_every_window() {
    // Every interval of `a` ends exactly where one of `b` ends.
    let a = vec![slot(14, 9, 0, 60), slot(14, 11, 0, 60)];
    let b = vec![slot(14, 9, 30, 30), slot(14, 10, 30, 90)];

    let windows = intersect_pair(&a, &b, Duration::minutes(15));

    assert_eq!(windows, vec![slot(14, 9, 30, 30), slot(14, 11, 0, 60)]);
}

#[test]
fn one_long_interval_against_many_short_ones() {
    let long = vec![slot(14, 8, 0, 600)];
    let short: Vec<Interval> = (0..8).map(|h| slot(14, 8 + h, 15, 30)).collect();

    let windows = intersect_pair(&long, &short, half_hour());
    assert_eq!(windows, short);

    let flipped = intersect_pair(&short, &long, half_hour());
    assert_eq!(flipped, short);
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[test]
fn empty_sequence_list_is_rejected() {
    let err = schedule(&[], half_hour(), &[]).unwrap_err();
    assert_eq!(err, SlotError::NoParticipants);
}

#[test]
fn duration_longer_than_any_timestamp_range_fits_nowhere() {
    let ranges = schedule(&[alice(), bob()], Duration::MAX, &[]).unwrap();
    assert!(ranges.is_empty());

    let windows = intersect_pair(&alice(), &bob(), Duration::MAX);
    assert!(windows.is_empty());
}

#[test]
fn zero_and_negative_durations_are_rejected() {
    let err = schedule(&[alice()], Duration::zero(), &[]).unwrap_err();
    assert_eq!(err, SlotError::NonPositiveDuration { seconds: 0 });

    let err = schedule(&[alice()], Duration::minutes(-1), &[]).unwrap_err();
    assert_eq!(err, SlotError::NonPositiveDuration { seconds: -60 });
}

#[test]
fn malformed_sequence_is_rejected_with_its_index() {
    let overlapping = vec![slot(14, 9, 0, 60), slot(14, 9, 30, 60)];

    match schedule(&[alice(), bob()], half_hour(), &[overlapping]) {
        Err(SlotError::InvalidSchedule {
            sequence, position, ..
        }) => {
            // Constraints are numbered after the participants.
            assert_eq!(sequence, 2);
            assert_eq!(position, 1);
        }
        other => panic!("expected InvalidSchedule, got {:?}", other),
    }
}

#[test]
fn malformed_sequence_is_rejected_even_after_empty_intersection() {
    let unsorted = vec![slot(14, 12, 0, 60), slot(14, 9, 0, 60)];
    let result = schedule(&[vec![slot(14, 9, 0, 60)], Vec::new(), unsorted], half_hour(), &[]);
    assert!(matches!(result, Err(SlotError::InvalidSchedule { sequence: 2, .. })));
}
