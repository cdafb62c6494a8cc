//! # schedule-engine
//!
//! Deterministic working-hours evaluation for dialers and other gated actions.
//!
//! Given a recurring availability window (working days plus a daily start/end
//! time, possibly wrapping past midnight) and an instant, the engine decides
//! whether the instant is inside the window and, when it is not, computes the
//! next instant at which it will be. All functions are pure: "now" is always a
//! parameter, never read from the system clock.
//!
//! ## Modules
//!
//! - [`window`] — availability window configuration and parsing
//! - [`evaluator`] — membership decision and next-activation search
//! - [`zone`] — evaluation in the window's configured IANA timezone
//! - [`explain`] — evaluation with a step-by-step trace
//! - [`error`] — Error types

pub mod error;
pub mod evaluator;
pub mod explain;
pub mod window;
pub mod zone;

pub use error::ScheduleError;
pub use evaluator::{
    evaluate, evaluate_optional, find_next_activation, is_time_within, EvaluationResult,
    OutsideReason,
};
pub use explain::{evaluate_with_trace, TracedEvaluation};
pub use window::{parse_weekday, weekday_name, AvailabilityWindow, TimeOfDay};
pub use zone::{evaluate_in_zone, evaluate_in_zone_with_trace, next_activation_in_zone, parse_timezone};
