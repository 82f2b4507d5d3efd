//! Resolves which widget configuration to evaluate.
//!
//! Precedence, highest first:
//!
//! 1. Inline working hours (`--hours`) replace whatever the file says.
//! 2. An explicit config file (`--config`) must exist.
//! 3. The per-user default file is used if present.
//! 4. Otherwise the built-in defaults (always available).

use std::path::{Path, PathBuf};

use parley_core::widget::ConfigError;
use parley_core::{WidgetConfig, WorkingHours};
use thiserror::Error;
use tracing::{debug, info};

/// Errors resolving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The inline working hours are not a JSON array.
    #[error("invalid --hours value: {0}")]
    InlineHours(#[source] serde_json::Error),
}

/// Result type for settings resolution.
pub type Result<T> = std::result::Result<T, SettingsError>;

/// User-supplied configuration sources.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Explicit config file.
    pub config_path: Option<PathBuf>,
    /// Inline working hours as a JSON array.
    pub inline_hours: Option<String>,
}

impl Settings {
    /// Resolves the widget config, falling back to the per-user default file.
    pub fn resolve(&self) -> Result<WidgetConfig> {
        self.resolve_with_default(WidgetConfig::default_path().as_deref())
    }

    /// Resolves the widget config using `default_path` as the fallback file.
    pub fn resolve_with_default(&self, default_path: Option<&Path>) -> Result<WidgetConfig> {
        let config = match (&self.config_path, default_path) {
            (Some(path), _) => WidgetConfig::load(path)?,
            (None, Some(path)) => match WidgetConfig::load(path) {
                Err(ConfigError::NotFound(_)) => {
                    info!("No widget config at {:?}, using defaults", path);
                    WidgetConfig::default()
                }
                loaded => loaded?,
            },
            (None, None) => {
                info!("No widget config directory, using defaults");
                WidgetConfig::default()
            }
        };

        match &self.inline_hours {
            Some(json) => {
                let hours = WorkingHours::from_json(json).map_err(SettingsError::InlineHours)?;
                debug!(
                    entries = hours.len(),
                    ignored = hours.ignored(),
                    "Using inline working hours"
                );
                Ok(config.with_working_hours(hours))
            }
            None => Ok(config),
        }
    }
}
