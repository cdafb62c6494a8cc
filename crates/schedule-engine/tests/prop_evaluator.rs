//! Property-based tests for evaluation and next-activation search.
//!
//! These check invariants that must hold for *any* window and instant, not just
//! the scenarios in `evaluator_tests.rs`. All instants are UTC, so there are no
//! DST gaps and start times are always exact.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc, Weekday};
use proptest::prelude::*;
use schedule_engine::{evaluate, find_next_activation, AvailabilityWindow, TimeOfDay};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn arb_time() -> impl Strategy<Value = TimeOfDay> {
    (0u8..=23, 0u8..=59).prop_map(|(h, m)| TimeOfDay::new(h, m).unwrap())
}

fn arb_days() -> impl Strategy<Value = Vec<Weekday>> {
    prop::collection::vec(prop::sample::select(ALL_DAYS.to_vec()), 1..=7)
}

fn arb_window() -> impl Strategy<Value = AvailabilityWindow> {
    (arb_days(), arb_time(), arb_time())
        .prop_map(|(days, start, end)| AvailabilityWindow::new(days, start, end, "UTC"))
}

/// An instant in 2025-2027, minute precision.
fn arb_now() -> impl Strategy<Value = DateTime<Utc>> {
    (2025i32..=2027, 1u32..=12, 1u32..=28, 0u32..=23, 0u32..=59)
        .prop_map(|(y, mo, d, h, mi)| Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: next activation is strictly in the future and within 8 days
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn next_activation_is_future_and_bounded(w in arb_window(), now in arb_now()) {
        let next = find_next_activation(&w, &now);
        prop_assert!(next > now, "next {} not after now {}", next, now);
        prop_assert!((next - now).num_days() <= 7, "next {} too far from {}", next, now);
    }
}

// ---------------------------------------------------------------------------
// Property 2: next activation lands on a configured day at exactly start
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn next_activation_is_a_window_start(w in arb_window(), now in arb_now()) {
        let next = find_next_activation(&w, &now);
        prop_assert!(w.days.contains(&next.weekday()));
        prop_assert_eq!(next.hour(), u32::from(w.start.hour()));
        prop_assert_eq!(next.minute(), u32::from(w.start.minute()));
        prop_assert_eq!(next.second(), 0);
    }
}

// ---------------------------------------------------------------------------
// Property 3: evaluating at the reported next transition is within window
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn next_transition_is_within_window(w in arb_window(), now in arb_now()) {
        let result = evaluate(&w, &now);
        if result.within_window {
            prop_assert!(result.reason.is_none());
            prop_assert!(result.next_transition.is_none());
        } else {
            prop_assert!(result.reason.is_some());
            let next = result.next_transition.expect("outside result must carry next transition");
            prop_assert!(evaluate(&w, &next).within_window);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: no earlier start exists between now and the reported transition
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn next_activation_is_earliest(w in arb_window(), now in arb_now()) {
        let next = find_next_activation(&w, &now);
        for day in 0..=7 {
            let date = now.date_naive() + chrono::Days::new(day);
            let candidate = date.and_time(w.start.to_naive()).and_utc();
            if candidate > now && w.days.contains(&date.weekday()) {
                prop_assert_eq!(next, candidate);
                break;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: evaluation is deterministic
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn evaluation_is_deterministic(w in arb_window(), now in arb_now()) {
        prop_assert_eq!(evaluate(&w, &now), evaluate(&w, &now));
    }
}
