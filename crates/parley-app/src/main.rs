//! Parley - prints whether a chat widget channel is online.
//!
//! Loads the widget configuration, evaluates its working hours against the
//! current local time (or `--at`), and prints the status label.

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local};
use clap::Parser;
use parley_app::{Settings, StatusReport};
use tracing_subscriber::EnvFilter;

/// Parley - chat widget availability
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
struct Args {
    /// Widget config file (defaults to the per-user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Working hours as a JSON array, replacing those in the config file
    #[arg(long, value_name = "JSON")]
    hours: Option<String>,

    /// Evaluate at this RFC 3339 instant instead of the local time now
    #[arg(long, value_name = "TIME", value_parser = parse_instant)]
    at: Option<DateTime<FixedOffset>>,

    /// Also print which entry decided
    #[arg(long)]
    explain: bool,

    /// Print the status as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_instant(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("expected RFC 3339 time: {}", e))
}

/// Initialize console logging on stderr.
fn init_logging(args: &Args) {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parley={0},parley_app={0},parley_core={0},warn",
            log_level
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let settings = Settings {
        config_path: args.config.clone(),
        inline_hours: args.hours.clone(),
    };
    let config = settings
        .resolve()
        .context("Failed to load widget configuration")?;

    let decision = match &args.at {
        Some(at) => config.decide_at(at),
        None => config.decide_at(&Local::now()),
    };
    tracing::debug!("Channel {:?}: {:?}", config.channel_name, decision);

    let report = StatusReport::new(&config, decision);
    if args.json {
        println!("{}", report.to_json().context("Failed to encode status")?);
    } else {
        println!("{}", report.render_text(args.explain));
    }

    Ok(())
}
