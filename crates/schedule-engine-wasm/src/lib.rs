//! WASM bindings for schedule-engine.
//!
//! Exposes working-hours evaluation and next-activation search to JavaScript
//! via `wasm-bindgen`. The window and all results cross the boundary as JSON
//! strings; instants are RFC 3339 strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/schedule-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```
//!
//! ## Window JSON
//!
//! ```json
//! {"days": ["Monday", "Friday"], "start": "09:00", "end": "17:00", "timezone": "UTC"}
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use schedule_engine::{AvailabilityWindow, EvaluationResult};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationDto {
    is_within_window: bool,
    reason: Option<String>,
    next_transition_instant: Option<String>,
    evaluated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Vec<String>>,
}

impl From<&EvaluationResult> for EvaluationDto {
    fn from(r: &EvaluationResult) -> Self {
        Self {
            is_within_window: r.within_window,
            reason: r.reason.as_ref().map(ToString::to_string),
            next_transition_instant: r.next_transition.map(|dt| dt.to_rfc3339()),
            evaluated_at: r.evaluated_at.to_rfc3339(),
            trace: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an ISO 8601 datetime string, keeping its offset.
///
/// Accepts RFC 3339 (e.g., "2026-03-17T10:00:00-03:00") and naive local time
/// (e.g., "2026-03-17T10:00:00"), which is interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<FixedOffset>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc().fixed_offset())
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_window_json(json: &str) -> Result<AvailabilityWindow, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid window JSON: {}", e))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn evaluate_json(window_json: &str, now: &str, explain: bool) -> Result<String, String> {
    let window = parse_window_json(window_json)?;
    let now = parse_datetime(now)?;

    if explain {
        let traced = schedule_engine::evaluate_with_trace(&window, &now);
        let mut dto = EvaluationDto::from(&traced.result);
        dto.trace = Some(traced.trace);
        to_json(&dto)
    } else {
        to_json(&EvaluationDto::from(&schedule_engine::evaluate(&window, &now)))
    }
}

fn evaluate_in_zone_json(window_json: &str, now: &str) -> Result<String, String> {
    let window = parse_window_json(window_json)?;
    let now: DateTime<Utc> = parse_datetime(now)?.with_timezone(&Utc);
    let result = schedule_engine::evaluate_in_zone(&window, now).map_err(|e| e.to_string())?;
    to_json(&EvaluationDto::from(&result))
}

fn next_activation_string(window_json: &str, now: &str) -> Result<String, String> {
    let window = parse_window_json(window_json)?;
    let now = parse_datetime(now)?;
    Ok(schedule_engine::find_next_activation(&window, &now).to_rfc3339())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Evaluate a working window at `now`, using the wall-clock fields of `now`
/// as given (its own offset).
///
/// Returns a JSON object `{isWithinWindow, reason, nextTransitionInstant,
/// evaluatedAt}`; with `explain` set it also carries a `trace` array.
#[wasm_bindgen(js_name = "evaluateSchedule")]
pub fn evaluate_schedule(window_json: &str, now: &str, explain: bool) -> Result<String, JsValue> {
    evaluate_json(window_json, now, explain).map_err(|e| JsValue::from_str(&e))
}

/// Evaluate a working window at `now`, reading days and times in the window's
/// configured IANA timezone.
#[wasm_bindgen(js_name = "evaluateScheduleInZone")]
pub fn evaluate_schedule_in_zone(window_json: &str, now: &str) -> Result<String, JsValue> {
    evaluate_in_zone_json(window_json, now).map_err(|e| JsValue::from_str(&e))
}

/// The next instant after `now` at which the window opens, as RFC 3339.
#[wasm_bindgen(js_name = "nextActivation")]
pub fn next_activation(window_json: &str, now: &str) -> Result<String, JsValue> {
    next_activation_string(window_json, now).map_err(|e| JsValue::from_str(&e))
}
