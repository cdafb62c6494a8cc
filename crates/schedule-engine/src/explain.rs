//! Human-readable evaluation traces.
//!
//! [`evaluate_with_trace`] runs the exact same decision path as
//! [`crate::evaluate`] while recording each step, so a caller can show why an
//! instant was accepted or rejected without re-deriving the arithmetic.

use chrono::{DateTime, TimeZone};

use crate::evaluator::{self, EvaluationResult};
use crate::window::AvailabilityWindow;

/// An evaluation together with the steps that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TracedEvaluation {
    pub result: EvaluationResult,
    /// One line per decision step, in order.
    pub trace: Vec<String>,
}

impl TracedEvaluation {
    /// The trace joined into a single newline-separated block.
    pub fn trace_text(&self) -> String {
        self.trace.join("\n")
    }
}

/// Evaluate `window` at `now` and record every decision step.
///
/// The returned `result` is identical to `evaluate(window, now)`.
pub fn evaluate_with_trace<Tz: TimeZone>(
    window: &AvailabilityWindow,
    now: &DateTime<Tz>,
) -> TracedEvaluation {
    let mut trace = Trace::enabled();
    let result = evaluator::evaluate_traced(window, now, &mut trace);
    TracedEvaluation {
        result,
        trace: trace.into_lines(),
    }
}

/// Optional step recorder threaded through the evaluator.
///
/// Lines are only formatted when recording is enabled.
#[derive(Debug, Default)]
pub(crate) struct Trace {
    lines: Option<Vec<String>>,
}

impl Trace {
    pub(crate) fn disabled() -> Self {
        Self { lines: None }
    }

    pub(crate) fn enabled() -> Self {
        Self {
            lines: Some(Vec::new()),
        }
    }

    pub(crate) fn note(&mut self, line: impl FnOnce() -> String) {
        if let Some(lines) = self.lines.as_mut() {
            lines.push(line());
        }
    }

    pub(crate) fn into_lines(self) -> Vec<String> {
        self.lines.unwrap_or_default()
    }
}
