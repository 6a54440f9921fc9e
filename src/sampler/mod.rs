//! Signal/noise sampling from a platform diagnostic command.
//!
//! A [`Sampler`] produces one [`Reading`] per call. The production
//! implementation is [`CommandSampler`], which shells out to the OS Wi-Fi
//! utility and parses its `Key: value` output. Readings are already scaled
//! from dBm into the 0-100 percentage range the chart uses.

mod command;
mod parse;

pub use command::{CommandSampler, DEFAULT_COMMAND};
pub use parse::{dbm_to_percent, parse_output};

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// One signal/noise reading, both expressed as a percentage of the usable
/// dBm range.
///
/// Values outside the -100..=-30 dBm range extrapolate below 0 or above
/// 100; they are not clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub signal: f64,
    pub noise: f64,
}

/// Errors produced while taking a reading.
#[derive(Debug, Error)]
pub enum SampleError {
    /// The external command could not be run, exited non-zero, or wrote
    /// something that is not text.
    #[error("command failed: {0}")]
    Command(String),

    /// The command output did not have the expected shape.
    #[error("unexpected command output: {0}")]
    Parse(String),
}

/// Trait for anything that can produce signal/noise readings.
///
/// Implementations may block for as long as the underlying utility takes;
/// there is no timeout on a reading.
///
/// # Example
///
/// ```no_run
/// use wifiwatch::{CommandSampler, Sampler};
///
/// # tokio_test::block_on(async {
/// let mut sampler = CommandSampler::default();
/// let reading = sampler.sample().await?;
/// println!("signal {:.1}% noise {:.1}%", reading.signal, reading.noise);
/// # Ok::<_, wifiwatch::SampleError>(())
/// # }).unwrap();
/// ```
#[async_trait]
pub trait Sampler: Send + Debug {
    /// Take one reading.
    async fn sample(&mut self) -> Result<Reading, SampleError>;

    /// Returns a human-readable description of the sampler.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;
}
