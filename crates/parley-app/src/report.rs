//! Status output for the command line.

use parley_core::{Decision, DecisionSource, WidgetConfig};
use serde::Serialize;

/// Evaluated status of a widget channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    /// Channel name from the config.
    pub channel: String,
    /// Whether the channel is online.
    pub available: bool,
    /// Configured label for the verdict.
    pub label: String,
    /// What produced the verdict.
    pub source: DecisionSource,
    /// Number of configured entries that were not recognized.
    #[serde(skip_serializing_if = "is_zero")]
    pub ignored_entries: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl StatusReport {
    /// Builds a report from a config and the decision made on it.
    pub fn new(config: &WidgetConfig, decision: Decision) -> Self {
        Self {
            channel: config.channel_name.clone(),
            available: decision.available,
            label: config.label(decision.available).to_string(),
            source: decision.source,
            ignored_entries: config
                .working_hours
                .as_ref()
                .map_or(0, |hours| hours.ignored()),
        }
    }

    /// Plain-text rendering: the label, optionally followed by the reason.
    pub fn render_text(&self, explain: bool) -> String {
        if !explain {
            return self.label.clone();
        }

        let mut text = format!("{}: {} ({})", self.channel, self.label, self.source);
        if self.ignored_entries > 0 {
            text.push_str(&format!(
                "\n{} working-hours entr{} ignored",
                self.ignored_entries,
                if self.ignored_entries == 1 { "y" } else { "ies" }
            ));
        }
        text
    }

    /// JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
