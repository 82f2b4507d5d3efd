//! Parley Core - working-hours availability for the chat widget.
//!
//! Decides whether a support channel presents itself as online or offline
//! from an optional working-hours configuration and the current time.
//!
//! ## Example
//!
//! ```
//! use chrono::{FixedOffset, TimeZone};
//! use parley_core::{is_available_at, WorkingHours};
//!
//! let hours = WorkingHours::from_json(r#"[["monday", 9.00, 17.00]]"#).unwrap();
//! let tz = FixedOffset::east_opt(0).unwrap();
//!
//! // 2024-03-04 is a Monday.
//! let morning = tz.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();
//! let evening = tz.with_ymd_and_hms(2024, 3, 4, 18, 0, 0).unwrap();
//!
//! assert!(is_available_at(Some(&hours), &morning));
//! assert!(!is_available_at(Some(&hours), &evening));
//! assert!(is_available_at(None, &evening));
//! ```

pub mod availability;
pub mod entry;
pub mod schedule;
pub mod widget;

pub use availability::{
    decide, decide_at, evaluate_timestamps, evaluate_weekdays, is_available, is_available_at,
    Decision, DecisionSource, MatchKind,
};
pub use entry::{Entry, IndexedEntry, TimestampEntry, WeekdayEntry, WorkingHours};
pub use schedule::{TimeOfDay, Weekday};
pub use widget::{ConfigError, WidgetConfig};
