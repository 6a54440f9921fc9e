//! Application state and user actions.

use tracing::{info, warn};

use crate::controller::{Controller, RunState};
use crate::data::{History, Sample};
use crate::recorder::Recorder;
use crate::ui::Theme;

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,

    controller: Controller,
    pub history: History,
    recorder: Recorder,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App around a controller, an empty history and a recorder.
    pub fn new(controller: Controller, history: History, recorder: Recorder, theme: Theme) -> Self {
        Self {
            running: true,
            show_help: false,
            controller,
            history,
            recorder,
            theme,
            status_message: None,
        }
    }

    /// Read-only access to the controller.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        self.controller.state()
    }

    /// Returns a description of the sampler in use.
    pub fn source_description(&self) -> &str {
        self.controller.sampler_description()
    }

    /// Returns the database path samples are written to.
    pub fn database_description(&self) -> String {
        self.recorder.path().display().to_string()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Pull delivered samples from the sampling loop into history and storage.
    ///
    /// Returns the number of samples ingested.
    pub fn tick(&mut self) -> usize {
        let samples = self.controller.drain();
        let count = samples.len();
        for sample in samples {
            self.ingest(sample);
        }
        count
    }

    /// Record one sample in history, then persist it.
    ///
    /// A storage failure is logged and otherwise ignored; the sample stays in
    /// history and is drawn on the next frame.
    pub fn ingest(&mut self, sample: Sample) {
        self.history.record(sample);
        if let Err(e) = self.recorder.persist(&sample) {
            warn!(error = %e, "record update failure");
        }
    }

    /// Start or stop sampling.
    pub fn toggle_sampling(&mut self) {
        match self.controller.toggle() {
            RunState::Running => self.set_status_message(format!(
                "Sampling every {}s",
                self.controller.interval().secs()
            )),
            RunState::Idle => {
                self.set_status_message("Stopping after the current interval".to_string())
            }
        }
    }

    /// Lengthen the sampling interval (only while idle).
    pub fn increase_interval(&mut self) {
        if !self.controller.increase_interval() {
            self.set_status_message("Stop sampling to change the interval".to_string());
        }
    }

    /// Shorten the sampling interval (only while idle).
    pub fn decrease_interval(&mut self) {
        if !self.controller.decrease_interval() {
            self.set_status_message("Stop sampling to change the interval".to_string());
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        info!(samples = self.history.total(), "quitting");
        self.controller.shutdown();
        self.running = false;
    }
}
