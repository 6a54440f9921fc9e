//! # wifiwatch
//!
//! A diagnostic TUI and library that samples Wi-Fi signal and noise levels,
//! appends every reading to a local SQLite file and charts them live.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │   app    │──▶│   data   │──▶│    ui    │──▶│ Terminal │  │
//! │  │ (state)  │   │ (history)│   │ (chart)  │   │          │  │
//! │  └────┬─────┘   └────┬─────┘   └──────────┘   └──────────┘  │
//! │       │              │                                       │
//! │       ▼              ▼                                       │
//! │  ┌──────────┐   ┌──────────┐                                 │
//! │  │controller│   │ recorder │──▶ SQLite (wifi_data)           │
//! │  │  (loop)  │   └──────────┘                                 │
//! │  └────┬─────┘                                                │
//! │       ▼                                                      │
//! │  ┌──────────┐                                                │
//! │  │ sampler  │◀── CommandSampler (airport -I | grep Ctl)      │
//! │  └──────────┘                                                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`sampler`]**: The [`Sampler`] trait and [`CommandSampler`], which runs
//!   the OS utility and converts dBm into a 0-100 scale
//! - **[`controller`]**: Idle/Running state machine and the background
//!   sampling loop
//! - **[`data`]**: [`Sample`], [`History`] and the noise [`RunningAverage`]
//! - **[`recorder`]**: Insert-only SQLite persistence
//! - **[`ui`]**: ratatui rendering of the chart, header and status bar
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Sample every 2 seconds into the default wifi_db.db
//! wifiwatch --interval 2
//!
//! # Use a different utility and database
//! wifiwatch --command "my-wifi-probe" --database /tmp/wifi.db
//! ```
//!
//! ### As a library
//!
//! ```
//! use wifiwatch::controller::{shared, Interval};
//! use wifiwatch::{CommandSampler, Controller};
//!
//! # tokio_test::block_on(async {
//! let sampler = shared(CommandSampler::default());
//! let controller =
//!     Controller::new(sampler, tokio::runtime::Handle::current(), Interval::default());
//! assert!(!controller.is_running());
//! # });
//! ```

pub mod app;
pub mod controller;
pub mod data;
pub mod events;
pub mod recorder;
pub mod sampler;
pub mod settings;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use controller::{Controller, Interval, RunState};
pub use data::{History, RunningAverage, Sample};
pub use recorder::{PersistError, Recorder};
pub use sampler::{CommandSampler, Reading, SampleError, Sampler};
