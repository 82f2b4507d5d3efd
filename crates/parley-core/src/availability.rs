//! Availability evaluation for a chat channel.
//!
//! ## Evaluation Order
//!
//! 1. No working hours configured: available.
//! 2. Timestamp windows are scanned first. If any of them has an opinion it
//!    is final, so one-off closures and openings override the weekly
//!    schedule.
//! 3. Weekday windows for the current day are scanned next.
//! 4. Default available if no entry applies.
//!
//! Within each scan a window that contains `now` settles the verdict and
//! stops the scan. A window that `now` has passed (or is outside of) only
//! sets a tentative verdict which a later entry may replace.
//!
//! The current time is sampled once by [`is_available`] / [`decide`] and
//! passed down, so every entry is judged against the same instant.

use std::fmt;
use std::ops::ControlFlow;

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entry::{TimestampEntry, WeekdayEntry, WorkingHours};
use crate::schedule::{TimeOfDay, Weekday};

/// How an entry related to the evaluated instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The instant lies within the window. Terminal.
    Contained,
    /// The instant is after a timestamp window's end, on the same day of the
    /// month as that end.
    PastEnd,
    /// The instant is before or after today's weekday window.
    OutsideHours,
    /// Today's weekday window has a bound that is not a number.
    InvalidBounds,
}

impl MatchKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            MatchKind::Contained => "contained",
            MatchKind::PastEnd => "past end",
            MatchKind::OutsideHours => "outside hours",
            MatchKind::InvalidBounds => "invalid bounds",
        }
    }

    /// Returns true if this kind stops the scan.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchKind::Contained)
    }
}

/// Which part of the configuration produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DecisionSource {
    /// No working hours configured.
    #[default]
    Unrestricted,
    /// A timestamp window decided.
    Timestamp {
        /// Position of the entry in the configured list.
        index: usize,
        /// How the window related to now.
        rule: MatchKind,
    },
    /// A weekday window decided.
    Weekday {
        /// Position of the entry in the configured list.
        index: usize,
        /// How the window related to now.
        rule: MatchKind,
    },
    /// Entries exist but none applies to now.
    Default,
}

impl DecisionSource {
    /// Returns the deciding entry's position, if an entry decided.
    pub fn index(&self) -> Option<usize> {
        match self {
            DecisionSource::Timestamp { index, .. } | DecisionSource::Weekday { index, .. } => {
                Some(*index)
            }
            DecisionSource::Unrestricted | DecisionSource::Default => None,
        }
    }

    /// Returns true if a timestamp window decided.
    pub fn is_timestamp(&self) -> bool {
        matches!(self, DecisionSource::Timestamp { .. })
    }

    /// Returns true if a weekday window decided.
    pub fn is_weekday(&self) -> bool {
        matches!(self, DecisionSource::Weekday { .. })
    }
}

impl fmt::Display for DecisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionSource::Unrestricted => f.write_str("no working hours configured"),
            DecisionSource::Timestamp { index, rule } => {
                write!(f, "timestamp entry #{} ({})", index, rule.name())
            }
            DecisionSource::Weekday { index, rule } => {
                write!(f, "weekday entry #{} ({})", index, rule.name())
            }
            DecisionSource::Default => f.write_str("no entry applies"),
        }
    }
}

/// Result of evaluating working hours at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the channel should present itself as online.
    pub available: bool,
    /// What produced the verdict.
    pub source: DecisionSource,
}

impl Decision {
    /// Available because nothing restricts it.
    pub fn unrestricted() -> Self {
        Self {
            available: true,
            source: DecisionSource::Unrestricted,
        }
    }

    /// Available because no configured entry applies.
    pub fn by_default() -> Self {
        Self {
            available: true,
            source: DecisionSource::Default,
        }
    }
}

/// Returns whether the channel is available right now, in local time.
pub fn is_available(config: Option<&WorkingHours>) -> bool {
    decide(config).available
}

/// Returns whether the channel is available at `now`.
///
/// Day names, clock times and day-of-month comparisons use `now`'s timezone.
pub fn is_available_at<Tz: TimeZone>(config: Option<&WorkingHours>, now: &DateTime<Tz>) -> bool {
    decide_at(config, now).available
}

/// Evaluates working hours right now, in local time.
pub fn decide(config: Option<&WorkingHours>) -> Decision {
    decide_at(config, &Local::now())
}

/// Evaluates working hours at `now` and reports which entry decided.
pub fn decide_at<Tz: TimeZone>(config: Option<&WorkingHours>, now: &DateTime<Tz>) -> Decision {
    let hours = match config {
        Some(hours) if !hours.is_empty() => hours,
        _ => return Decision::unrestricted(),
    };

    let decision = if let Some(verdict) = scan_timestamps(hours.timestamp_entries(), now) {
        Decision {
            available: verdict.available,
            source: DecisionSource::Timestamp {
                index: verdict.index,
                rule: verdict.rule,
            },
        }
    } else if let Some(verdict) = scan_weekdays(hours.weekday_entries(), now) {
        Decision {
            available: verdict.available,
            source: DecisionSource::Weekday {
                index: verdict.index,
                rule: verdict.rule,
            },
        }
    } else {
        Decision::by_default()
    };

    debug!(
        available = decision.available,
        source = %decision.source,
        "Evaluated working hours"
    );
    decision
}

/// Scans timestamp windows in order.
///
/// Returns `None` when no window has an opinion about `now`.
pub fn evaluate_timestamps<Tz: TimeZone>(
    entries: &[TimestampEntry],
    now: &DateTime<Tz>,
) -> Option<bool> {
    scan_timestamps(entries.iter().enumerate(), now).map(|v| v.available)
}

/// Scans weekday windows in order. Defaults to available.
pub fn evaluate_weekdays<Tz: TimeZone>(entries: &[WeekdayEntry], now: &DateTime<Tz>) -> bool {
    scan_weekdays(entries.iter().enumerate(), now).map_or(true, |v| v.available)
}

/// Verdict of one scan, with the entry that produced it.
#[derive(Debug, Clone, Copy)]
struct Verdict {
    available: bool,
    index: usize,
    rule: MatchKind,
}

/// What a single entry says about now.
enum Step {
    /// The entry has nothing to say.
    Silent,
    /// The entry proposes a verdict.
    Verdict(MatchKind, bool),
}

/// Running state of a scan.
enum Scan {
    Unset,
    Tentative(Verdict),
}

/// Left fold over entries: tentative verdicts are overwritten by later
/// entries, a containment match ends the fold.
fn scan<'a, E: 'a, I, F>(mut entries: I, mut judge: F) -> Option<Verdict>
where
    I: Iterator<Item = (usize, &'a E)>,
    F: FnMut(&E) -> Step,
{
    let outcome = entries.try_fold(Scan::Unset, |state, (index, entry)| match judge(entry) {
        Step::Silent => ControlFlow::Continue(state),
        Step::Verdict(rule, available) => {
            let verdict = Verdict {
                available,
                index,
                rule,
            };
            trace!(index, rule = rule.name(), available, "Entry verdict");
            if rule.is_terminal() {
                ControlFlow::Break(verdict)
            } else {
                ControlFlow::Continue(Scan::Tentative(verdict))
            }
        }
    });

    match outcome {
        ControlFlow::Break(verdict) | ControlFlow::Continue(Scan::Tentative(verdict)) => {
            Some(verdict)
        }
        ControlFlow::Continue(Scan::Unset) => None,
    }
}

fn scan_timestamps<'a, Tz, I>(entries: I, now: &DateTime<Tz>) -> Option<Verdict>
where
    Tz: TimeZone,
    I: Iterator<Item = (usize, &'a TimestampEntry)>,
{
    let now_millis = now.timestamp_millis();
    let timezone = now.timezone();

    scan(entries, |entry| {
        let Some(end) = entry.end_millis() else {
            return Step::Silent;
        };

        if now_millis > end {
            // Only the day of the month is compared, not month or year.
            let same_day = timezone
                .timestamp_millis_opt(end)
                .single()
                .is_some_and(|end| end.day() == now.day());
            if same_day {
                return Step::Verdict(MatchKind::PastEnd, !entry.is_open);
            }
            Step::Silent
        } else {
            match entry.start_millis() {
                Some(start) if start <= now_millis => {
                    Step::Verdict(MatchKind::Contained, entry.is_open)
                }
                _ => Step::Silent,
            }
        }
    })
}

fn scan_weekdays<'a, Tz, I>(entries: I, now: &DateTime<Tz>) -> Option<Verdict>
where
    Tz: TimeZone,
    I: Iterator<Item = (usize, &'a WeekdayEntry)>,
{
    let today = Weekday::of(now);
    let current = TimeOfDay::of(now);

    scan(entries, |entry| {
        if !today.matches(&entry.day_name) {
            return Step::Silent;
        }

        match (entry.start, entry.end) {
            (Some(start), Some(end)) if current < start || current > end => {
                Step::Verdict(MatchKind::OutsideHours, !entry.is_open)
            }
            (Some(_), Some(_)) => Step::Verdict(MatchKind::Contained, entry.is_open),
            _ => Step::Verdict(MatchKind::InvalidBounds, false),
        }
    })
}
