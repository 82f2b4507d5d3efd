//! Widget configuration.
//!
//! The configuration payload a widget receives from its host page. Keys are
//! camelCase to match the payload the embedding script serves; every key is
//! optional.
//!
//! ```json
//! {
//!   "channelName": "Sales",
//!   "onlineLabel": "We're here",
//!   "offlineLabel": "Leave a message",
//!   "workingHours": [["monday", 9, 17.30], [1735686000, 1735772400, false]]
//! }
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::availability::{self, Decision};
use crate::entry::WorkingHours;

/// File name of the configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "widget.json";

/// Default channel name.
pub const DEFAULT_CHANNEL_NAME: &str = "Support";

/// Errors that can occur when loading a widget configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid configuration document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Chat widget configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    /// Name shown in the widget header.
    pub channel_name: String,
    /// Status text when the channel is available.
    pub online_label: String,
    /// Status text when the channel is unavailable.
    pub offline_label: String,
    /// Working hours. `None` means always available.
    pub working_hours: Option<WorkingHours>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            online_label: "online".to_string(),
            offline_label: "offline".to_string(),
            working_hours: None,
        }
    }
}

impl WidgetConfig {
    /// Parses a configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if let Some(hours) = &config.working_hours {
            debug!(
                entries = hours.len(),
                ignored = hours.ignored(),
                "Parsed working hours"
            );
        }
        Ok(config)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::NotFound(path.to_path_buf()),
            _ => ConfigError::Io(e),
        })?;
        debug!("Loaded widget config from {:?}", path);
        Self::from_json(&json)
    }

    /// Default configuration file location for this user.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "parley", "Parley")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Replaces the working hours.
    pub fn with_working_hours(mut self, hours: WorkingHours) -> Self {
        self.working_hours = Some(hours);
        self
    }

    /// Status text for a verdict.
    pub fn label(&self, available: bool) -> &str {
        if available {
            &self.online_label
        } else {
            &self.offline_label
        }
    }

    /// Evaluates this configuration's working hours at `now`.
    pub fn decide_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Decision {
        availability::decide_at(self.working_hours.as_ref(), now)
    }

    /// Returns whether the channel is available right now, in local time.
    pub fn is_available_now(&self) -> bool {
        availability::is_available(self.working_hours.as_ref())
    }
}
