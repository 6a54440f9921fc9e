//! Command-backed sampler.
//!
//! Runs a shell command and parses its stdout.

use async_trait::async_trait;
use tokio::process::Command;

use super::{parse_output, Reading, SampleError, Sampler};

/// The macOS `airport` utility, filtered down to the RSSI and noise lines.
pub const DEFAULT_COMMAND: &str = "/System/Library/PrivateFrameworks/Apple80211.framework/Versions/Current/Resources/airport -I | grep Ctl";

/// A sampler that runs a shell command for every reading.
///
/// The command is run through `sh -c`, so pipes and redirections work.
/// Its stdout must start with a signal line followed by a noise line.
#[derive(Debug, Clone)]
pub struct CommandSampler {
    command: String,
    description: String,
}

impl CommandSampler {
    /// Create a sampler for the given shell command line.
    pub fn new(command: impl Into<String>) -> Self {
        let command = command.into();
        let description = format!("cmd: {}", command);
        Self {
            command,
            description,
        }
    }

    /// Returns the command line being run.
    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Default for CommandSampler {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND)
    }
}

#[async_trait]
impl Sampler for CommandSampler {
    async fn sample(&mut self) -> Result<Reading, SampleError> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .output()
            .await
            .map_err(|e| SampleError::Command(format!("failed to run {:?}: {}", self.command, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SampleError::Command(format!(
                "{:?} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| SampleError::Command(format!("output is not UTF-8: {}", e)))?;

        parse_output(&stdout)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
