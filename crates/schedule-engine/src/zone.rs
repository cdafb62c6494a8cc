//! Evaluation in the window's configured IANA timezone.
//!
//! [`crate::evaluate`] reads the wall-clock fields of whatever instant it is
//! given. That is wrong when the schedule is defined for a different zone than
//! the caller's, so these wrappers convert a UTC instant into the configured
//! zone first.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::{Result, ScheduleError};
use crate::evaluator::{self, EvaluationResult};
use crate::explain::{self, TracedEvaluation};
use crate::window::AvailabilityWindow;

/// Parse an IANA timezone name (e.g. "America/Sao_Paulo").
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if the name is not in the tz database.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(name.to_string()))
}

/// Evaluate `window` at `now`, interpreting days and times in `window.timezone`.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` if `window.timezone` is not a
/// valid IANA identifier.
pub fn evaluate_in_zone(window: &AvailabilityWindow, now: DateTime<Utc>) -> Result<EvaluationResult> {
    let local = now.with_timezone(&parse_timezone(&window.timezone)?);
    Ok(evaluator::evaluate(window, &local))
}

/// Next activation of `window` after `now`, in `window.timezone`.
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` for an unknown zone name.
pub fn next_activation_in_zone(
    window: &AvailabilityWindow,
    now: DateTime<Utc>,
) -> Result<DateTime<Tz>> {
    let local = now.with_timezone(&parse_timezone(&window.timezone)?);
    Ok(evaluator::find_next_activation(window, &local))
}

/// Traced variant of [`evaluate_in_zone`].
///
/// # Errors
/// Returns `ScheduleError::InvalidTimezone` for an unknown zone name.
pub fn evaluate_in_zone_with_trace(
    window: &AvailabilityWindow,
    now: DateTime<Utc>,
) -> Result<TracedEvaluation> {
    let tz = parse_timezone(&window.timezone)?;
    let local = now.with_timezone(&tz);
    let mut traced = explain::evaluate_with_trace(window, &local);
    traced.trace.insert(0, format!("interpreting schedule in {}", tz.name()));
    Ok(traced)
}
