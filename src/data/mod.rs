//! Data models for sampled readings.
//!
//! ## Submodules
//!
//! - [`sample`]: The immutable timestamped [`Sample`]
//! - [`history`]: [`History`] of samples for the current run and the
//!   [`RunningAverage`] of the noise series
//!
//! ## Data Flow
//!
//! ```text
//! Reading (from a Sampler)
//!        │
//!        ▼
//! Sample::now()
//!        │
//!        ├──▶ History::record() (chart series + noise average)
//!        │
//!        └──▶ Recorder::persist() (SQLite row)
//! ```

pub mod history;
pub mod sample;

pub use history::{History, RunningAverage};
pub use sample::Sample;
