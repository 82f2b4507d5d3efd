//! Parley - command-line front-end for chat widget availability.
//!
//! This crate provides the pieces behind the `parley` binary:
//!
//! - Settings resolution (config file, per-user default, inline hours)
//! - Status reports in plain text or JSON

pub mod report;
pub mod settings;

pub use report::StatusReport;
pub use settings::{Settings, SettingsError};
