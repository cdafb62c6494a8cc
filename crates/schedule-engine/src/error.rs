//! Error types for schedule-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid day of week: {0}")]
    InvalidDay(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
