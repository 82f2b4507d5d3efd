//! Calendar primitives used by working-hours evaluation.
//!
//! This module resolves a point in time to the two values the weekday rules
//! compare against: the lowercase English day name and the decimal
//! time-of-day encoding.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Long day names, Sunday first.
const DAY_NAMES: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Days of the week, ordered Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All days of the week, Sunday first.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Converts from chrono's Weekday.
    pub fn from_chrono(weekday: chrono::Weekday) -> Self {
        match weekday {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }

    /// Returns the day the given moment falls on, in the moment's own timezone.
    pub fn of<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self {
        Self::from_chrono(moment.weekday())
    }

    /// Position in a Sunday-first week (Sunday = 0, Saturday = 6).
    pub fn index(self) -> usize {
        self.num_days_from_sunday() as usize
    }

    /// Lowercase long English name, e.g. `"monday"`.
    pub fn name(self) -> &'static str {
        DAY_NAMES[self.index()]
    }

    /// Case-insensitive comparison against a configured day name.
    ///
    /// No trimming or abbreviation is applied: `"Mon"` and `" monday"` never
    /// match.
    pub fn matches(self, day_name: &str) -> bool {
        day_name.to_lowercase() == self.name()
    }

    fn num_days_from_sunday(self) -> u32 {
        match self {
            Weekday::Sunday => 0,
            Weekday::Monday => 1,
            Weekday::Tuesday => 2,
            Weekday::Wednesday => 3,
            Weekday::Thursday => 4,
            Weekday::Friday => 5,
            Weekday::Saturday => 6,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clock time in the lexical `H.MM` decimal encoding.
///
/// Hour 9 minute 5 encodes as `9.05` and hour 14 minute 30 as `14.3`. The
/// value mirrors the written form, it is not a count of hours, so it is only
/// meaningful when compared against another value built the same way.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TimeOfDay(f64);

impl TimeOfDay {
    /// Encodes an hour/minute pair.
    pub fn new(hour: u32, minute: u32) -> Self {
        let encoded = format!("{hour}.{minute:02}");
        Self(encoded.parse().unwrap_or(f64::NAN))
    }

    /// Creates a TimeOfDay from hour only (minute = 0).
    pub fn from_hour(hour: u32) -> Self {
        Self::new(hour, 0)
    }

    /// Creates from a chrono NaiveTime. Seconds are discarded.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self::new(time.hour(), time.minute())
    }

    /// Wall-clock time of the given moment in its own timezone.
    pub fn of<Tz: TimeZone>(moment: &DateTime<Tz>) -> Self {
        Self::from_naive_time(moment.time())
    }

    /// Wraps an already-encoded value such as a configured `17.30`.
    ///
    /// Returns `None` for NaN, which is the unparseable state.
    pub fn from_encoded(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Parses a configured bound: a JSON number, or a string holding one.
    ///
    /// Anything else (booleans, null, arrays, blank or non-numeric strings)
    /// is unparseable.
    pub fn parse(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().and_then(Self::from_encoded),
            Value::String(s) => s.trim().parse().ok().and_then(Self::from_encoded),
            _ => None,
        }
    }

    /// The encoded decimal value.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
