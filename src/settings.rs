//! Layered runtime settings.
//!
//! Values are resolved in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. An optional settings file (`--config`, any format the `config` crate reads)
//! 3. `WIFIWATCH_*` environment variables (e.g. `WIFIWATCH_DATABASE`)
//! 4. Command-line flags
//!
//! ```toml
//! interval = 2
//! database = "wifi_db.db"
//! command = "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport -I | grep Ctl"
//! log_file = "wifiwatch.log"
//! history = 3600
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::controller::Interval;
use crate::data::history::DEFAULT_CAPACITY;
use crate::sampler::DEFAULT_COMMAND;

/// Resolved settings for one run of the tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Initial sampling interval in seconds (1-10).
    pub interval: u64,
    /// SQLite file samples are appended to.
    pub database: PathBuf,
    /// Shell command producing the signal and noise lines.
    pub command: String,
    /// File diagnostics are logged to while the TUI owns the terminal.
    pub log_file: PathBuf,
    /// Number of samples kept in memory for the chart.
    pub history: usize,
}

/// Values given on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub interval: Option<u64>,
    pub database: Option<PathBuf>,
    pub command: Option<String>,
    pub log_file: Option<PathBuf>,
    pub history: Option<usize>,
}

impl Settings {
    /// Resolve settings from defaults, an optional file, the environment
    /// and command-line overrides.
    pub fn load(file: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("interval", Interval::default().secs())?
            .set_default("database", "wifi_db.db")?
            .set_default("command", DEFAULT_COMMAND)?
            .set_default("log_file", "wifiwatch.log")?
            .set_default("history", DEFAULT_CAPACITY as u64)?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }

        builder = builder
            .add_source(Environment::with_prefix("WIFIWATCH"))
            .set_override_option("interval", overrides.interval)?
            .set_override_option("database", path_value(&overrides.database))?
            .set_override_option("command", overrides.command.clone())?
            .set_override_option("log_file", path_value(&overrides.log_file))?
            .set_override_option("history", overrides.history.map(|h| h as u64))?;

        let settings: Settings = builder
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")?;

        settings.interval()?;
        Ok(settings)
    }

    /// The configured interval, validated against the selectable range.
    pub fn interval(&self) -> Result<Interval> {
        Interval::new(self.interval).context("invalid interval setting")
    }
}

fn path_value(path: &Option<PathBuf>) -> Option<String> {
    path.as_ref().map(|p| p.display().to_string())
}
