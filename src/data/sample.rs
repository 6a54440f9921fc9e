//! The timestamped sample produced once per sampling cycle.

use chrono::{DateTime, Local};

use crate::sampler::Reading;

/// One normalized signal/noise reading plus the moment it was taken.
///
/// Samples are immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    signal: f64,
    noise: f64,
    timestamp: DateTime<Local>,
}

impl Sample {
    /// Create a sample from percentage values.
    pub fn new(signal: f64, noise: f64, timestamp: DateTime<Local>) -> Self {
        Self {
            signal,
            noise,
            timestamp,
        }
    }

    /// Stamp a reading with the current local time.
    pub fn now(reading: Reading) -> Self {
        Self::new(reading.signal, reading.noise, Local::now())
    }

    /// Signal level in percent of the usable range.
    pub fn signal(&self) -> f64 {
        self.signal
    }

    /// Noise level in percent of the usable range.
    pub fn noise(&self) -> f64 {
        self.noise
    }

    /// How far the signal sits above the noise floor, in percentage points.
    pub fn margin(&self) -> f64 {
        self.signal - self.noise
    }

    /// When the reading was taken.
    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }
}
