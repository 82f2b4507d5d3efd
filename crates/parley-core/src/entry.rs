//! Working-hours entries and their classification.
//!
//! A widget configuration carries working hours as a list of loosely typed
//! JSON arrays. Each array is classified here, once, against two shapes:
//!
//! - `[start, end]` or `[start, end, is_open]`: an absolute window in epoch
//!   seconds ([`TimestampEntry`]).
//! - `[day, start, end]` or `[day, start, end, is_open]`: a recurring window on
//!   a named weekday, bounds in the `H.MM` encoding ([`WeekdayEntry`]).
//!
//! The shapes are tested independently, so `["monday", 9, true]` is both a
//! timestamp window and a weekday window. Arrays matching neither shape are
//! dropped and counted, never reported as errors.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::schedule::TimeOfDay;

/// Largest magnitude of a representable instant, in milliseconds.
const MAX_EPOCH_MILLIS: f64 = 8.64e15;

/// An absolute window between two epoch-second instants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampEntry {
    /// Start of the window in epoch seconds. NaN when not numeric.
    pub start: f64,
    /// End of the window in epoch seconds. NaN when not numeric.
    pub end: f64,
    /// Whether the window marks open hours (`true`) or a closure (`false`).
    pub is_open: bool,
}

impl TimestampEntry {
    /// Creates an open window.
    pub fn open(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            is_open: true,
        }
    }

    /// Creates a closed window.
    pub fn closed(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            is_open: false,
        }
    }

    /// Start as whole epoch milliseconds, or `None` if not a valid instant.
    pub fn start_millis(&self) -> Option<i64> {
        seconds_to_millis(self.start)
    }

    /// End as whole epoch milliseconds, or `None` if not a valid instant.
    pub fn end_millis(&self) -> Option<i64> {
        seconds_to_millis(self.end)
    }

    /// Reads `[start, end]` or `[start, end, is_open]`.
    pub fn classify(value: &Value) -> Option<Self> {
        let (start, end, is_open) = match value.as_array()?.as_slice() {
            [start, end] => (start, end, true),
            [start, end, Value::Bool(is_open)] => (start, end, *is_open),
            _ => return None,
        };
        Some(Self {
            start: epoch_seconds(start),
            end: epoch_seconds(end),
            is_open,
        })
    }
}

/// A recurring window on a named day of the week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayEntry {
    /// Day name as configured; compared case-insensitively.
    pub day_name: String,
    /// Opening bound, `None` when the configured value was not numeric.
    pub start: Option<TimeOfDay>,
    /// Closing bound, `None` when the configured value was not numeric.
    pub end: Option<TimeOfDay>,
    /// Whether the window marks open hours (`true`) or a closure (`false`).
    pub is_open: bool,
}

impl WeekdayEntry {
    /// Creates an open window.
    pub fn open(day_name: impl Into<String>, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            day_name: day_name.into(),
            start: Some(start),
            end: Some(end),
            is_open: true,
        }
    }

    /// Creates a closed window.
    pub fn closed(day_name: impl Into<String>, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            is_open: false,
            ..Self::open(day_name, start, end)
        }
    }

    /// Returns true if both bounds parsed.
    pub fn has_valid_bounds(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Reads `[day, start, end]` or `[day, start, end, is_open]`.
    ///
    /// The day must be a string; the bounds may be anything and are kept as
    /// unparseable when not numeric.
    pub fn classify(value: &Value) -> Option<Self> {
        let (day, start, end, is_open) = match value.as_array()?.as_slice() {
            [day, start, end] => (day, start, end, true),
            [day, start, end, Value::Bool(is_open)] => (day, start, end, *is_open),
            _ => return None,
        };
        let day_name = day.as_str()?;
        Some(Self {
            day_name: day_name.to_string(),
            start: TimeOfDay::parse(start),
            end: TimeOfDay::parse(end),
            is_open,
        })
    }
}

/// One classified working-hours rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Absolute, date-specific window.
    Timestamp(TimestampEntry),
    /// Recurring weekly window.
    Weekday(WeekdayEntry),
}

impl Entry {
    /// Classifies a raw configuration value against both shapes.
    ///
    /// Returns the timestamp reading first, then the weekday reading. Empty
    /// when the value matches neither, including non-arrays and weekday
    /// arrays whose day is not a string.
    pub fn classify(value: &Value) -> Vec<Self> {
        TimestampEntry::classify(value)
            .map(Entry::Timestamp)
            .into_iter()
            .chain(WeekdayEntry::classify(value).map(Entry::Weekday))
            .collect()
    }

    /// Returns the open/closed flag of either shape.
    pub fn is_open(&self) -> bool {
        match self {
            Entry::Timestamp(entry) => entry.is_open,
            Entry::Weekday(entry) => entry.is_open,
        }
    }
}

impl From<TimestampEntry> for Entry {
    fn from(entry: TimestampEntry) -> Self {
        Entry::Timestamp(entry)
    }
}

impl From<WeekdayEntry> for Entry {
    fn from(entry: WeekdayEntry) -> Self {
        Entry::Weekday(entry)
    }
}

/// A classified entry together with its position in the configured list.
///
/// A value matching both shapes yields two entries with the same index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    /// Zero-based position in the configured list, counting dropped values.
    pub index: usize,
    /// The classified entry.
    pub entry: Entry,
}

/// An ordered working-hours configuration.
///
/// Order is significant: later entries may override tentative verdicts of
/// earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingHours {
    entries: Vec<IndexedEntry>,
    ignored: usize,
    next_index: usize,
}

impl WorkingHours {
    /// Creates an empty configuration (always available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies raw configuration values, dropping unrecognized ones.
    pub fn from_values(values: &[Value]) -> Self {
        let mut hours = Self::new();
        for (index, value) in values.iter().enumerate() {
            let entries = Entry::classify(value);
            if entries.is_empty() {
                debug!(index, %value, "Ignoring unrecognized working-hours entry");
                hours.ignored += 1;
            }
            hours
                .entries
                .extend(entries.into_iter().map(|entry| IndexedEntry { index, entry }));
        }
        hours.next_index = values.len();
        hours
    }

    /// Parses a JSON array of raw entries.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Builds a configuration from already-typed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut hours = Self::new();
        for entry in entries {
            hours.push(entry);
        }
        hours
    }

    /// Appends an entry after all existing ones.
    pub fn push(&mut self, entry: impl Into<Entry>) {
        self.entries.push(IndexedEntry {
            index: self.next_index,
            entry: entry.into(),
        });
        self.next_index += 1;
    }

    /// Returns true if nothing was configured at all.
    ///
    /// A list consisting only of unrecognized values is not empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.ignored == 0
    }

    /// Number of classified entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Number of configured values dropped during classification.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    /// Recognized entries in configured order.
    pub fn entries(&self) -> impl Iterator<Item = &IndexedEntry> {
        self.entries.iter()
    }

    /// Timestamp windows in configured order, with their positions.
    pub fn timestamp_entries(&self) -> impl Iterator<Item = (usize, &TimestampEntry)> {
        self.entries.iter().filter_map(|e| match &e.entry {
            Entry::Timestamp(entry) => Some((e.index, entry)),
            Entry::Weekday(_) => None,
        })
    }

    /// Weekday windows in configured order, with their positions.
    pub fn weekday_entries(&self) -> impl Iterator<Item = (usize, &WeekdayEntry)> {
        self.entries.iter().filter_map(|e| match &e.entry {
            Entry::Weekday(entry) => Some((e.index, entry)),
            Entry::Timestamp(_) => None,
        })
    }
}

impl<'de> Deserialize<'de> for WorkingHours {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<Value>::deserialize(deserializer)?;
        Ok(Self::from_values(&values))
    }
}

/// Reads an epoch-seconds value: a JSON number or a numeric string.
fn epoch_seconds(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

fn seconds_to_millis(seconds: f64) -> Option<i64> {
    let millis = (seconds * 1000.0).trunc();
    if millis.is_finite() && millis.abs() <= MAX_EPOCH_MILLIS {
        Some(millis as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== Classification Tests ====================

    #[test]
    fn classify_timestamp_pair() {
        let entries = Entry::classify(&json!([1_700_000_000, 1_700_003_600]));
        assert_eq!(
            entries,
            vec![Entry::Timestamp(TimestampEntry::open(
                1_700_000_000.0,
                1_700_003_600.0
            ))]
        );
    }

    #[test]
    fn classify_timestamp_with_flag() {
        let entries = Entry::classify(&json!([10, 20, false]));
        assert_eq!(
            entries,
            vec![Entry::Timestamp(TimestampEntry::closed(10.0, 20.0))]
        );
        assert!(!entries[0].is_open());
    }

    #[test]
    fn classify_weekday_triple() {
        let weekday = WeekdayEntry::classify(&json!(["Monday", 9, "17.30"])).unwrap();
        assert_eq!(weekday.day_name, "Monday");
        assert_eq!(weekday.start.map(TimeOfDay::value), Some(9.0));
        assert_eq!(weekday.end.map(TimeOfDay::value), Some(17.3));
        assert!(weekday.is_open);

        assert_eq!(
            Entry::classify(&json!(["Monday", 9, "17.30"])),
            vec![Entry::Weekday(weekday)]
        );
    }

    #[test]
    fn classify_weekday_with_flag() {
        let entries = Entry::classify(&json!(["friday", 12, 13, false]));
        assert_eq!(
            entries,
            vec![Entry::Weekday(WeekdayEntry::closed(
                "friday",
                TimeOfDay::from_hour(12),
                TimeOfDay::from_hour(13)
            ))]
        );
    }

    #[test]
    fn classify_weekday_keeps_unparseable_bounds() {
        let weekday = WeekdayEntry::classify(&json!(["monday", "nine", "five"])).unwrap();
        assert!(!weekday.has_valid_bounds());
    }

    #[test]
    fn classify_three_elements_with_flag_matches_both_shapes() {
        let entries = Entry::classify(&json!(["monday", 9, true]));
        assert_eq!(entries.len(), 2);

        match &entries[0] {
            Entry::Timestamp(t) => {
                assert!(t.start.is_nan());
                assert_eq!(t.end, 9.0);
                assert!(t.is_open);
            }
            other => panic!("expected timestamp entry, got {:?}", other),
        }
        match &entries[1] {
            Entry::Weekday(w) => {
                assert_eq!(w.day_name, "monday");
                assert_eq!(w.start.map(TimeOfDay::value), Some(9.0));
                assert!(w.end.is_none());
                assert!(w.is_open);
            }
            other => panic!("expected weekday entry, got {:?}", other),
        }

        // A non-string day leaves only the timestamp reading.
        assert_eq!(
            Entry::classify(&json!([1, 2, true])),
            vec![Entry::Timestamp(TimestampEntry::open(1.0, 2.0))]
        );
    }

    #[test]
    fn classify_rejects_malformed_values() {
        assert!(Entry::classify(&json!([])).is_empty());
        assert!(Entry::classify(&json!([1])).is_empty());
        assert!(Entry::classify(&json!([[]])).is_empty());
        assert!(Entry::classify(&json!(["monday", 9, 17, "yes"])).is_empty());
        assert!(Entry::classify(&json!(["monday", 9, 17, true, 1])).is_empty());
        assert!(Entry::classify(&json!([1, 9, 17])).is_empty());
        assert!(Entry::classify(&json!(null)).is_empty());
        assert!(Entry::classify(&json!("monday")).is_empty());
        assert!(Entry::classify(&json!({"day": "monday"})).is_empty());
    }

    #[test]
    fn classify_non_numeric_timestamps_are_invalid_instants() {
        let t = TimestampEntry::classify(&json!(["a", {}])).unwrap();
        assert!(t.start_millis().is_none());
        assert!(t.end_millis().is_none());
    }

    #[test]
    fn epoch_seconds_accepts_only_numbers_and_numeric_strings() {
        assert_eq!(epoch_seconds(&json!(1_700_000_000)), 1_700_000_000.0);
        assert_eq!(epoch_seconds(&json!("12.5")), 12.5);
        assert_eq!(epoch_seconds(&json!(" 7 ")), 7.0);

        for value in [
            json!(null),
            json!(true),
            json!(false),
            json!(""),
            json!("  "),
            json!("soon"),
            json!([]),
            json!({}),
        ] {
            assert!(epoch_seconds(&value).is_nan(), "{} should not be an instant", value);
        }
    }

    #[test]
    fn timestamp_millis_conversion() {
        let entry = TimestampEntry::open(1.5, 1e300);
        assert_eq!(entry.start_millis(), Some(1500));
        assert_eq!(entry.end_millis(), None);
        assert_eq!(TimestampEntry::open(-0.0015, 0.0).start_millis(), Some(-1));

        assert_eq!(
            TimestampEntry::classify(&json!(["100", " 200 "])),
            Some(TimestampEntry::open(100.0, 200.0))
        );
    }

    // ==================== WorkingHours Tests ====================

    #[test]
    fn working_hours_partition_preserves_order_and_indices() {
        let hours = WorkingHours::from_values(&[
            json!(["monday", 9, 17]),
            json!([100, 200]),
            json!("garbage"),
            json!(["tuesday", 10, 18, false]),
            json!([300, 400, false]),
        ]);

        assert_eq!(hours.len(), 4);
        assert_eq!(hours.ignored(), 1);
        assert!(!hours.is_empty());

        let stamps: Vec<usize> = hours.timestamp_entries().map(|(i, _)| i).collect();
        assert_eq!(stamps, vec![1, 4]);

        let days: Vec<(usize, &str)> = hours
            .weekday_entries()
            .map(|(i, e)| (i, e.day_name.as_str()))
            .collect();
        assert_eq!(days, vec![(0, "monday"), (3, "tuesday")]);
    }

    #[test]
    fn working_hours_only_ignored_is_not_empty() {
        let hours = WorkingHours::from_values(&[json!([1]), json!(null)]);
        assert_eq!(hours.len(), 0);
        assert_eq!(hours.ignored(), 2);
        assert!(!hours.is_empty());
        assert!(WorkingHours::new().is_empty());
    }

    #[test]
    fn working_hours_push_continues_indices() {
        let mut hours = WorkingHours::from_values(&[json!([1]), json!([10, 20])]);
        hours.push(WeekdayEntry::open(
            "sunday",
            TimeOfDay::from_hour(8),
            TimeOfDay::from_hour(12),
        ));

        let indices: Vec<usize> = hours.entries().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn working_hours_dual_shape_lands_in_both_partitions() {
        let mut hours = WorkingHours::from_values(&[json!(["monday", 9, true])]);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours.ignored(), 0);
        assert_eq!(hours.timestamp_entries().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);
        assert_eq!(hours.weekday_entries().map(|(i, _)| i).collect::<Vec<_>>(), vec![0]);

        hours.push(TimestampEntry::open(0.0, 1.0));
        let indices: Vec<usize> = hours.entries().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 0, 1]);
    }

    #[test]
    fn working_hours_from_typed_entries() {
        let hours = WorkingHours::from_entries([
            Entry::from(TimestampEntry::closed(0.0, 60.0)),
            Entry::from(WeekdayEntry::open(
                "monday",
                TimeOfDay::from_hour(9),
                TimeOfDay::from_hour(17),
            )),
        ]);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours.ignored(), 0);
        assert_eq!(hours.timestamp_entries().count(), 1);
        assert_eq!(hours.weekday_entries().map(|(i, _)| i).next(), Some(1));
    }

    #[test]
    fn working_hours_from_json() {
        let hours = WorkingHours::from_json(r#"[["monday", 9.00, 17.00], [1, 2, true]]"#).unwrap();
        assert_eq!(hours.len(), 2);

        assert!(WorkingHours::from_json(r#"{"monday": [9, 17]}"#).is_err());
        assert!(WorkingHours::from_json("[]").unwrap().is_empty());
    }
}
