//! Weekly time slot model.
//!
//! A time slot is a fixed `(day, start, end)` interval on the working week.
//! Slots are authored by the configuration source and never modified by
//! the engine.
//!
//! # Time Model
//! Clock times are `chrono::NaiveTime` values with minute precision and are
//! exchanged as `"HH:MM"` (24h) strings. Intervals are half-open:
//! `[start, end)`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};

/// One of the five working days.
///
/// Serialized as the English name. Deserialization accepts whatever
/// [`FromStr`] accepts, so `"monday"` and `"Mon"` load too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
}

impl Weekday {
    /// The working week in calendar order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// English day name.
    pub fn as_str(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monday" | "mon" => Ok(Weekday::Monday),
            "tuesday" | "tue" => Ok(Weekday::Tuesday),
            "wednesday" | "wed" => Ok(Weekday::Wednesday),
            "thursday" | "thu" => Ok(Weekday::Thursday),
            "friday" | "fri" => Ok(Weekday::Friday),
            _ => Err(format!("Unknown working day: {s}")),
        }
    }
}

impl TryFrom<String> for Weekday {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.trim().parse()
    }
}

/// Parses a `HH:MM` clock time.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| TimetableError::InvalidTime {
        value: value.to_string(),
    })
}

/// Formats a clock time as `HH:MM`.
pub fn format_time(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Minutes elapsed since midnight.
#[inline]
pub fn minutes_from_midnight(time: NaiveTime) -> i64 {
    (time.hour() as i64) * 60 + (time.minute() as i64)
}

/// Half-open interval overlap: `startA < endB && startB < endA`.
#[inline]
pub fn intervals_overlap(
    a_start: NaiveTime,
    a_end: NaiveTime,
    b_start: NaiveTime,
    b_end: NaiveTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Serde adapter for `NaiveTime` as `"HH:MM"`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(D::Error::custom)
    }
}

/// A fixed weekly interval available for scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Unique slot identifier.
    pub id: String,
    /// Working day.
    pub day: Weekday,
    /// Interval start (inclusive).
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    /// Interval end (exclusive).
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

/// Morning periods, break, late-morning periods, lunch, afternoon periods.
const DEFAULT_PERIODS: [(&str, &str); 8] = [
    ("08:30", "09:20"),
    ("09:20", "10:10"),
    // break 10:10-10:30
    ("10:30", "11:20"),
    ("11:20", "12:10"),
    // lunch 12:10-13:00
    ("13:00", "13:50"),
    ("13:50", "14:40"),
    ("14:40", "15:30"),
    ("15:30", "16:20"),
];

impl TimeSlot {
    /// Creates a slot from already-parsed times.
    pub fn new(id: impl Into<String>, day: Weekday, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        Self {
            id: id.into(),
            day,
            start_time,
            end_time,
        }
    }

    /// Creates a slot from `HH:MM` strings.
    pub fn parse(id: impl Into<String>, day: Weekday, start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(id, day, parse_time(start)?, parse_time(end)?))
    }

    /// The default week: eight 50-minute periods per working day with a
    /// morning break and a lunch break.
    pub fn default_week() -> Vec<TimeSlot> {
        let mut slots = Vec::with_capacity(Weekday::ALL.len() * DEFAULT_PERIODS.len());
        for day in Weekday::ALL {
            for (period, (start, end)) in DEFAULT_PERIODS.iter().enumerate() {
                let (Some(start), Some(end)) = (const_time(start), const_time(end)) else {
                    continue;
                };
                slots.push(TimeSlot::new(
                    format!("{}-{}", day.as_str().to_ascii_lowercase(), period + 1),
                    day,
                    start,
                    end,
                ));
            }
        }
        slots
    }

    /// Slot length in minutes (derived).
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        minutes_from_midnight(self.end_time) - minutes_from_midnight(self.start_time)
    }

    /// Whether this slot can host a session of `minutes`.
    #[inline]
    pub fn fits(&self, minutes: i64) -> bool {
        self.duration_minutes() >= minutes
    }

    /// Whether `[start, end)` on `day` overlaps this slot.
    pub fn overlaps(&self, day: Weekday, start: NaiveTime, end: NaiveTime) -> bool {
        self.day == day && intervals_overlap(self.start_time, self.end_time, start, end)
    }

    /// `Monday 08:30-09:20`.
    pub fn label(&self) -> String {
        format!(
            "{} {}-{}",
            self.day,
            format_time(self.start_time),
            format_time(self.end_time)
        )
    }
}

fn const_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}
