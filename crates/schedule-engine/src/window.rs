//! Availability window configuration: working days plus a daily time range.
//!
//! A window is the only long-lived input to the evaluator. It is owned by
//! whatever settings store the caller uses; this module only defines its shape
//! and the parsing rules for its textual form (`"Monday"`, `"09:00"`).

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A validated wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Build a time of day, rejecting hours above 23 and minutes above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime(format!(
                "{:02}:{:02} is out of range (expected 00:00-23:59)",
                hour, minute
            )));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since midnight (`hour * 60 + minute`).
    pub fn minutes_of_day(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// Truncate a chrono time to minute precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        // chrono guarantees hour < 24 and minute < 60.
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }

    pub fn to_naive(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    /// Parse `"HH:MM"`, `"H:MM"` or `"HH:MM:SS"`. Seconds are validated and dropped.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ScheduleError::InvalidTime(format!("'{}' (expected HH:MM)", s));

        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid());
        }

        let field = |raw: &str| -> Result<u8> {
            if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            raw.parse::<u8>().map_err(|_| invalid())
        };

        let hour = field(parts[0])?;
        let minute = field(parts[1])?;
        if let Some(raw_seconds) = parts.get(2) {
            if field(raw_seconds)? > 59 {
                return Err(invalid());
            }
        }

        TimeOfDay::new(hour, minute)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// English full name of a weekday ("Monday" .. "Sunday").
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a weekday from its English full or three-letter name, ignoring case.
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| ScheduleError::InvalidDay(s.to_string()))
}

/// A recurring weekly availability window.
///
/// `start > end` describes an overnight window that wraps past midnight.
/// `start == end` is a single-minute window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Working days, in the order they were configured. Duplicates are harmless.
    #[serde(with = "weekday_list")]
    pub days: Vec<Weekday>,
    /// First minute of the window (inclusive).
    pub start: TimeOfDay,
    /// Last minute of the window (inclusive).
    pub end: TimeOfDay,
    /// IANA timezone name. Only [`crate::evaluate_in_zone`] interprets it.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for AvailabilityWindow {
    /// Monday to Friday, 09:00-17:00, UTC.
    fn default() -> Self {
        Self {
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
            start: TimeOfDay { hour: 9, minute: 0 },
            end: TimeOfDay { hour: 17, minute: 0 },
            timezone: default_timezone(),
        }
    }
}

impl AvailabilityWindow {
    pub fn new(
        days: Vec<Weekday>,
        start: TimeOfDay,
        end: TimeOfDay,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            days,
            start,
            end,
            timezone: timezone.into(),
        }
    }

    /// Build a window from textual day names and `"HH:MM"` times.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidDay` or `ScheduleError::InvalidTime` for
    /// the first field that fails to parse.
    pub fn from_names(days: &[&str], start: &str, end: &str, timezone: &str) -> Result<Self> {
        let days = days
            .iter()
            .map(|d| parse_weekday(d))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(days, start.parse()?, end.parse()?, timezone))
    }

    /// Whether `day` is one of the working days.
    pub fn includes_day(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// Whether the window wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.start > self.end
    }

    /// Configured days joined by ", " in stored order.
    pub fn day_list(&self) -> String {
        join_days(&self.days)
    }
}

pub(crate) fn join_days(days: &[Weekday]) -> String {
    days.iter()
        .map(|d| weekday_name(*d))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serde adapter storing weekdays as English names.
mod weekday_list {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_weekday, weekday_name};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(|d| weekday_name(*d)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Weekday>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .iter()
            .map(|name| parse_weekday(name).map_err(serde::de::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_rejects_out_of_range() {
        assert!(TimeOfDay::new(24, 0).is_err());
        assert!(TimeOfDay::new(23, 60).is_err());
        assert!(TimeOfDay::new(23, 59).is_ok());
    }

    #[test]
    fn time_of_day_parses_common_forms() {
        assert_eq!("09:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 0).unwrap());
        assert_eq!("9:05".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 5).unwrap());
        assert_eq!("17:30:45".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(17, 30).unwrap());
    }

    #[test]
    fn time_of_day_rejects_malformed_strings() {
        for bad in ["", "9", "25:00", "12:60", "12:00:61", "ab:cd", "12:5x", "1:2:3:4", "123:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{:?} should not parse", bad);
        }
    }

    #[test]
    fn minutes_of_day() {
        assert_eq!(TimeOfDay::new(0, 0).unwrap().minutes_of_day(), 0);
        assert_eq!(TimeOfDay::new(9, 30).unwrap().minutes_of_day(), 570);
        assert_eq!(TimeOfDay::new(23, 59).unwrap().minutes_of_day(), 1439);
    }

    #[test]
    fn weekday_parsing_accepts_long_and_short_names() {
        assert_eq!(parse_weekday("Monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("wed").unwrap(), Weekday::Wed);
        assert_eq!(parse_weekday(" SUNDAY ").unwrap(), Weekday::Sun);
        assert!(matches!(parse_weekday("Funday"), Err(ScheduleError::InvalidDay(_))));
    }

    #[test]
    fn overnight_detection() {
        let w = AvailabilityWindow::from_names(&["Monday"], "22:00", "06:00", "UTC").unwrap();
        assert!(w.is_overnight());
        let w = AvailabilityWindow::from_names(&["Monday"], "09:00", "09:00", "UTC").unwrap();
        assert!(!w.is_overnight());
    }
}
