//! Tests for evaluation in a named IANA timezone, including DST transitions.

use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;
use schedule_engine::{
    evaluate, evaluate_in_zone, evaluate_in_zone_with_trace, find_next_activation,
    next_activation_in_zone, parse_timezone, AvailabilityWindow, ScheduleError,
};

fn window_in(tz: &str, days: &[&str], start: &str, end: &str) -> AvailabilityWindow {
    AvailabilityWindow::from_names(days, start, end, tz).unwrap()
}

fn weekdays(tz: &str) -> AvailabilityWindow {
    window_in(
        tz,
        &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"],
        "09:00",
        "17:00",
    )
}

#[test]
fn schedule_is_read_in_configured_zone() {
    // Sao Paulo is UTC-3 all year; 11:00Z is 08:00 local.
    let w = weekdays("America/Sao_Paulo");
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 11, 0, 0).unwrap();

    let result = evaluate_in_zone(&w, now).unwrap();

    assert!(!result.within_window);
    assert_eq!(
        result.next_transition.unwrap().with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 3, 16, 12, 0, 0).unwrap()
    );
    assert_eq!(result.evaluated_at.offset().local_minus_utc(), -3 * 3600);

    // The same instant read as UTC wall-clock would be inside.
    assert!(evaluate(&w, &now).within_window);
}

#[test]
fn zone_shifts_the_weekday() {
    // Monday 01:00Z is still Sunday evening in New York.
    let w = weekdays("America/New_York");
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 1, 0, 0).unwrap();

    let result = evaluate_in_zone(&w, now).unwrap();

    assert!(!result.within_window);
    assert!(result.reason.unwrap().to_string().contains("Sunday"));
    // Monday 09:00 EDT == 13:00Z
    assert_eq!(
        result.next_transition.unwrap().with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 3, 16, 13, 0, 0).unwrap()
    );
}

#[test]
fn unknown_zone_is_an_error() {
    let w = weekdays("Mars/Olympus_Mons");
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 11, 0, 0).unwrap();

    assert_eq!(
        evaluate_in_zone(&w, now),
        Err(ScheduleError::InvalidTimezone("Mars/Olympus_Mons".to_string()))
    );
    assert!(next_activation_in_zone(&w, now).is_err());
    assert!(evaluate_in_zone_with_trace(&w, now).is_err());
}

#[test]
fn parse_timezone_accepts_iana_names() {
    assert!(parse_timezone("Europe/Lisbon").is_ok());
    assert!(parse_timezone("UTC").is_ok());
    assert!(parse_timezone("").is_err());
}

#[test]
fn start_inside_spring_forward_gap_moves_to_first_valid_minute() {
    // 2026-03-08 02:00 EST jumps to 03:00 EDT; 02:30 does not exist.
    let w = window_in("America/New_York", &["Sunday"], "02:30", "04:00");
    let now = New_York.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();

    let next = find_next_activation(&w, &now);

    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap()
    );
}

#[test]
fn start_inside_fall_back_fold_takes_earlier_instant() {
    // 2026-11-01 01:30 happens twice in New York; the EDT one is 05:30Z.
    let w = window_in("America/New_York", &["Sunday"], "01:30", "04:00");
    let now = New_York.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();

    let next = find_next_activation(&w, &now);

    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap()
    );
}

#[test]
fn second_pass_of_fold_finds_repeated_start_same_day() {
    // 06:15Z is 01:15 EST, after the EDT 01:30 has gone by but before the
    // EST 01:30 comes around.
    let w = window_in("America/New_York", &["Sunday"], "01:30", "04:00");
    let now = Utc.with_ymd_and_hms(2026, 11, 1, 6, 15, 0).unwrap();

    let result = evaluate_in_zone(&w, now).unwrap();
    let next = result.next_transition.unwrap().with_timezone(&Utc);

    assert!(!result.within_window);
    assert_eq!(next, Utc.with_ymd_and_hms(2026, 11, 1, 6, 30, 0).unwrap());
    assert!(evaluate_in_zone(&w, next).unwrap().within_window);
}

#[test]
fn window_entirely_inside_spring_forward_gap_skips_that_day() {
    // 02:10-02:40 does not exist on 2026-03-08 in New York.
    let w = window_in("America/New_York", &["Sunday"], "02:10", "02:40");
    let now = New_York.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();

    let next = find_next_activation(&w, &now);

    // The following Sunday, 02:10 EDT.
    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 3, 15, 6, 10, 0).unwrap()
    );
    assert!(evaluate(&w, &next).within_window);
}

#[test]
fn next_activation_in_zone_returns_zoned_instant() {
    let w = weekdays("Asia/Tokyo");
    // Saturday 2026-03-21 03:00Z = 12:00 JST Saturday.
    let now = Utc.with_ymd_and_hms(2026, 3, 21, 3, 0, 0).unwrap();

    let next = next_activation_in_zone(&w, now).unwrap();

    assert_eq!(next.timezone(), parse_timezone("Asia/Tokyo").unwrap());
    // Monday 09:00 JST == Monday 00:00Z
    assert_eq!(
        next.with_timezone(&Utc),
        Utc.with_ymd_and_hms(2026, 3, 23, 0, 0, 0).unwrap()
    );
}

#[test]
fn traced_zone_evaluation_names_the_zone() {
    let w = weekdays("Europe/Berlin");
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 10, 0, 0).unwrap();

    let traced = evaluate_in_zone_with_trace(&w, now).unwrap();

    assert_eq!(traced.trace[0], "interpreting schedule in Europe/Berlin");
    assert_eq!(traced.result, evaluate_in_zone(&w, now).unwrap());
}
