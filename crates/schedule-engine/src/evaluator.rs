//! Working-hours evaluation and next-activation search.
//!
//! Every function here is pure: the instant to evaluate is always a parameter,
//! and the evaluator works on the local calendar fields of that instant in its
//! own timezone. Use [`crate::evaluate_in_zone`] to interpret a window in its
//! configured IANA zone instead.

use std::fmt;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, TimeDelta, TimeZone, Weekday};

use crate::explain::Trace;
use crate::window::{join_days, weekday_name, AvailabilityWindow, TimeOfDay};

/// Number of consecutive days (today included) scanned for the next activation.
const SCAN_DAYS: u64 = 7;

/// Upper bound on how far a start time inside a DST gap is pushed forward.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Why an instant is outside the availability window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutsideReason {
    /// No window exists at all.
    NotConfigured,
    /// The window has an empty day list.
    NoWorkingDays,
    /// Today's weekday is not a working day.
    DayNotConfigured {
        today: Weekday,
        configured: Vec<Weekday>,
    },
    /// Today is a working day but the time of day is outside the range.
    OutsideHours {
        current: TimeOfDay,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

impl fmt::Display for OutsideReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutsideReason::NotConfigured => write!(f, "no working schedule configured"),
            OutsideReason::NoWorkingDays => write!(f, "no working days configured"),
            OutsideReason::DayNotConfigured { today, configured } => write!(
                f,
                "today is {}; working days are {}",
                weekday_name(*today),
                join_days(configured)
            ),
            OutsideReason::OutsideHours {
                current,
                start,
                end,
            } => write!(
                f,
                "current time {} is outside working hours {}-{}",
                current, start, end
            ),
        }
    }
}

/// Outcome of a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub within_window: bool,
    /// Present exactly when `within_window` is false.
    pub reason: Option<OutsideReason>,
    /// Earliest instant the window becomes active again. Present whenever
    /// `within_window` is false, except for [`OutsideReason::NotConfigured`].
    pub next_transition: Option<DateTime<FixedOffset>>,
    /// The evaluated instant, with its original offset.
    pub evaluated_at: DateTime<FixedOffset>,
}

impl EvaluationResult {
    fn inside(evaluated_at: DateTime<FixedOffset>) -> Self {
        Self {
            within_window: true,
            reason: None,
            next_transition: None,
            evaluated_at,
        }
    }

    fn outside(
        evaluated_at: DateTime<FixedOffset>,
        reason: OutsideReason,
        next_transition: Option<DateTime<FixedOffset>>,
    ) -> Self {
        Self {
            within_window: false,
            reason: Some(reason),
            next_transition,
            evaluated_at,
        }
    }

    /// One-line message suitable for showing to an operator.
    ///
    /// e.g. `Outside working hours (today is Tuesday; working days are Monday,
    /// Wednesday); next available 2026-03-18T09:00:00+00:00`
    pub fn summary(&self) -> String {
        if self.within_window {
            return "Within working hours".to_string();
        }
        let reason = self
            .reason
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match &self.next_transition {
            Some(next) => format!(
                "Outside working hours ({}); next available {}",
                reason,
                next.to_rfc3339()
            ),
            None => format!("Outside working hours ({})", reason),
        }
    }
}

/// Decide whether `now` falls inside `window`.
///
/// Boundaries are inclusive at minute precision: with a 09:00-17:00 window,
/// 09:00:00 and 17:00:59 are both inside. Overnight windows (`start > end`)
/// are inside from `start` through midnight and up to `end`, evaluated against
/// today's weekday only.
///
/// An empty day list is not an error: the result is outside with
/// [`OutsideReason::NoWorkingDays`].
pub fn evaluate<Tz: TimeZone>(window: &AvailabilityWindow, now: &DateTime<Tz>) -> EvaluationResult {
    evaluate_traced(window, now, &mut Trace::disabled())
}

/// Like [`evaluate`], but a missing window yields a defined
/// [`OutsideReason::NotConfigured`] result instead of requiring the caller to
/// special-case it.
pub fn evaluate_optional<Tz: TimeZone>(
    window: Option<&AvailabilityWindow>,
    now: &DateTime<Tz>,
) -> EvaluationResult {
    match window {
        Some(window) => evaluate(window, now),
        None => {
            tracing::debug!("no working schedule configured");
            EvaluationResult::outside(now.fixed_offset(), OutsideReason::NotConfigured, None)
        }
    }
}

/// Whether a time of day lies inside the daily range of `window`, ignoring days.
pub fn is_time_within(window: &AvailabilityWindow, time: TimeOfDay) -> bool {
    let current = time.minutes_of_day();
    let start = window.start.minutes_of_day();
    let end = window.end.minutes_of_day();
    if start <= end {
        start <= current && current <= end
    } else {
        current >= start || current <= end
    }
}

/// Earliest instant strictly after `now` at which `window` starts.
///
/// Scans today and the following six days for a working day whose start time
/// is still ahead. Today only qualifies if its start is strictly after `now`.
/// When nothing in that range qualifies (only today is configured and its
/// start has passed, or the day list is empty), falls back to the next
/// occurrence of the first configured day, or Monday for an empty list.
///
/// Start times that do not exist locally (DST gap) move forward to the first
/// valid minute, and the date is skipped if that minute is already past `end`.
/// Start times that repeat (DST fold) take the first occurrence after `now`.
pub fn find_next_activation<Tz: TimeZone>(
    window: &AvailabilityWindow,
    now: &DateTime<Tz>,
) -> DateTime<Tz> {
    next_activation_traced(window, now, &mut Trace::disabled())
}

pub(crate) fn evaluate_traced<Tz: TimeZone>(
    window: &AvailabilityWindow,
    now: &DateTime<Tz>,
    trace: &mut Trace,
) -> EvaluationResult {
    let evaluated_at = now.fixed_offset();
    let today = now.weekday();
    trace.note(|| {
        format!(
            "evaluating {} ({})",
            evaluated_at.to_rfc3339(),
            weekday_name(today)
        )
    });

    if window.days.is_empty() {
        trace.note(|| "no working days configured".to_string());
        let next = next_activation_traced(window, now, trace);
        tracing::debug!(at = %evaluated_at, "no working days configured");
        return EvaluationResult::outside(
            evaluated_at,
            OutsideReason::NoWorkingDays,
            Some(next.fixed_offset()),
        );
    }

    if !window.includes_day(today) {
        trace.note(|| {
            format!(
                "{} is not a working day ({})",
                weekday_name(today),
                window.day_list()
            )
        });
        let next = next_activation_traced(window, now, trace);
        tracing::debug!(
            at = %evaluated_at,
            today = weekday_name(today),
            next = %next.fixed_offset(),
            "outside working days"
        );
        return EvaluationResult::outside(
            evaluated_at,
            OutsideReason::DayNotConfigured {
                today,
                configured: window.days.clone(),
            },
            Some(next.fixed_offset()),
        );
    }
    trace.note(|| format!("{} is a working day", weekday_name(today)));

    let current = TimeOfDay::from_naive(now.time());
    let inside = is_time_within(window, current);
    trace.note(|| {
        let kind = if window.is_overnight() {
            "overnight"
        } else {
            "same-day"
        };
        format!(
            "minute {} against {} window {}-{} (minutes {}-{}): {}",
            current.minutes_of_day(),
            kind,
            window.start,
            window.end,
            window.start.minutes_of_day(),
            window.end.minutes_of_day(),
            if inside { "inside" } else { "outside" }
        )
    });

    if inside {
        tracing::trace!(at = %evaluated_at, "within working hours");
        return EvaluationResult::inside(evaluated_at);
    }

    let next = next_activation_traced(window, now, trace);
    tracing::debug!(
        at = %evaluated_at,
        current = %current,
        start = %window.start,
        end = %window.end,
        next = %next.fixed_offset(),
        "outside working hours"
    );
    EvaluationResult::outside(
        evaluated_at,
        OutsideReason::OutsideHours {
            current,
            start: window.start,
            end: window.end,
        },
        Some(next.fixed_offset()),
    )
}

pub(crate) fn next_activation_traced<Tz: TimeZone>(
    window: &AvailabilityWindow,
    now: &DateTime<Tz>,
    trace: &mut Trace,
) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();

    for offset in 0..SCAN_DAYS {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        if !window.includes_day(date.weekday()) {
            continue;
        }
        let starts = start_instants(&tz, date, window);
        if starts.is_empty() {
            trace.note(|| format!("{} {} does not exist locally, skipping", date, window.start));
            continue;
        }
        let Some(candidate) = starts.into_iter().find(|start| start > now) else {
            trace.note(|| format!("today's start {} has already passed", window.start));
            continue;
        };
        trace.note(|| {
            format!(
                "next activation {} ({}, +{} days)",
                candidate.fixed_offset().to_rfc3339(),
                weekday_name(date.weekday()),
                offset
            )
        });
        return candidate;
    }

    fallback_activation(window, now, trace)
}

/// Next occurrence of the first configured day (Monday when none) at `start`.
fn fallback_activation<Tz: TimeZone>(
    window: &AvailabilityWindow,
    now: &DateTime<Tz>,
    trace: &mut Trace,
) -> DateTime<Tz> {
    let target = window.days.first().copied().unwrap_or(Weekday::Mon);
    let tz = now.timezone();
    let today = now.date_naive();
    let ahead = (7 + u64::from(target.num_days_from_monday())
        - u64::from(today.weekday().num_days_from_monday()))
        % 7;

    for extra in [0, 7, 14] {
        let Some(date) = today.checked_add_days(Days::new(ahead + extra)) else {
            break;
        };
        let candidate = start_instants(&tz, date, window)
            .into_iter()
            .find(|start| start > now);
        if let Some(candidate) = candidate {
            trace.note(|| {
                format!(
                    "fallback to next {}: {}",
                    weekday_name(target),
                    candidate.fixed_offset().to_rfc3339()
                )
            });
            return candidate;
        }
    }

    // Unreachable for real timezones; keeps the search total.
    tracing::warn!(target_day = weekday_name(target), "no resolvable activation found");
    now.clone() + TimeDelta::days(7)
}

/// Instants at which `window` opens on local `date`, in ascending order.
///
/// Usually one. Two when the start time repeats in a DST fold. When the start
/// time falls in a DST gap, the first valid minute after it, provided that
/// minute is still inside the window; otherwise none.
fn start_instants<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    window: &AvailabilityWindow,
) -> Vec<DateTime<Tz>> {
    let naive = date.and_time(window.start.to_naive());
    let mapped = tz.from_local_datetime(&naive);
    if let (Some(earliest), Some(latest)) = (mapped.clone().earliest(), mapped.latest()) {
        return if earliest == latest {
            vec![earliest]
        } else {
            vec![earliest, latest]
        };
    }

    (1..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            tz.from_local_datetime(&(naive + TimeDelta::minutes(minutes)))
                .earliest()
        })
        .filter(|shifted| is_time_within(window, TimeOfDay::from_naive(shifted.time())))
        .into_iter()
        .collect()
}
