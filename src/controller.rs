//! Start/stop control and the background sampling loop.
//!
//! The [`Controller`] owns the run state. Starting it spawns
//! [`run_sampling_loop`] on a tokio runtime; the loop takes one reading,
//! hands the timestamped [`Sample`] to the UI thread over a channel, sleeps
//! for the configured interval and then checks whether it was asked to
//! stop. The UI thread collects delivered samples with
//! [`Controller::drain`] and never sleeps itself.
//!
//! ```text
//!  UI thread                              tokio task
//!  ─────────                              ──────────
//!  toggle() ──── spawn ─────────────────▶ loop {
//!                                           sampler.sample()
//!  drain()  ◀─── mpsc<Sample> ───────────   send(sample)
//!                                           sleep(interval)
//!  toggle() ──── watch<bool> = true ─────▶  if stop { break }
//!                                         }
//! ```

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::data::Sample;
use crate::sampler::Sampler;

/// A sampler shared between consecutive runs of the sampling loop.
///
/// The lock also guarantees two loops never sample at the same time.
pub type SharedSampler = Arc<Mutex<Box<dyn Sampler>>>;

/// Wrap a sampler so it can be handed to a [`Controller`].
pub fn shared(sampler: impl Sampler + 'static) -> SharedSampler {
    Arc::new(Mutex::new(Box::new(sampler)))
}

/// Interval value outside the selectable range.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("interval must be between 1 and 10 seconds, got {0}")]
pub struct InvalidInterval(pub u64);

/// Seconds between two samples, always within `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interval(u8);

impl Interval {
    /// Shortest selectable interval in seconds.
    pub const MIN: u8 = 1;
    /// Longest selectable interval in seconds.
    pub const MAX: u8 = 10;

    /// Create an interval, rejecting values outside `1..=10`.
    pub fn new(secs: u64) -> Result<Self, InvalidInterval> {
        if (Self::MIN as u64..=Self::MAX as u64).contains(&secs) {
            Ok(Self(secs as u8))
        } else {
            Err(InvalidInterval(secs))
        }
    }

    /// Interval length in whole seconds.
    pub fn secs(self) -> u64 {
        self.0 as u64
    }

    /// Interval length as a [`Duration`].
    pub fn as_duration(self) -> Duration {
        Duration::from_secs(self.secs())
    }

    /// One second longer, saturating at the maximum.
    pub fn increase(self) -> Self {
        Self((self.0 + 1).min(Self::MAX))
    }

    /// One second shorter, saturating at the minimum.
    pub fn decrease(self) -> Self {
        Self(self.0.saturating_sub(1).max(Self::MIN))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u64> for Interval {
    type Error = InvalidInterval;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::new(secs)
    }
}

/// Whether the sampling loop is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Not sampling; the interval can be changed.
    Idle,
    /// Sampling once per interval; the interval is locked.
    Running,
}

impl RunState {
    /// Returns the display label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Idle => "IDLE",
            RunState::Running => "RUNNING",
        }
    }
}

/// Take a sample, deliver it, sleep, repeat until stopped.
///
/// The stop flag is only checked after the sleep, so a stop request never
/// interrupts a sample or a sleep already in progress. A failed reading is
/// logged and the cycle is skipped; the loop keeps its schedule. The loop
/// also ends when the receiving side of `samples` is dropped.
///
/// Returns the number of samples delivered.
pub async fn run_sampling_loop(
    sampler: SharedSampler,
    interval: Duration,
    stop: watch::Receiver<bool>,
    samples: mpsc::UnboundedSender<Sample>,
) -> u64 {
    let mut delivered = 0;

    loop {
        let result = sampler.lock().await.sample().await;
        match result {
            Ok(reading) => {
                let sample = Sample::now(reading);
                debug!(signal = sample.signal(), noise = sample.noise(), "sample taken");
                if samples.send(sample).is_err() {
                    break;
                }
                delivered += 1;
            }
            Err(e) => warn!(error = %e, "sample failed, skipping cycle"),
        }

        tokio::time::sleep(interval).await;

        if *stop.borrow() || samples.is_closed() {
            break;
        }
    }

    delivered
}

/// One spawned sampling loop and its channels.
#[derive(Debug)]
struct Run {
    stop: watch::Sender<bool>,
    samples: mpsc::UnboundedReceiver<Sample>,
    handle: JoinHandle<u64>,
}

impl Run {
    /// Move everything delivered so far into `out`.
    ///
    /// Returns false once the loop has finished and its channel is empty.
    fn drain_into(&mut self, out: &mut Vec<Sample>) -> bool {
        loop {
            match self.samples.try_recv() {
                Ok(sample) => out.push(sample),
                Err(TryRecvError::Empty) => return true,
                Err(TryRecvError::Disconnected) => return false,
            }
        }
    }
}

/// Owns the Idle/Running state machine and the sampling task.
#[derive(Debug)]
pub struct Controller {
    sampler: SharedSampler,
    description: String,
    runtime: Handle,
    interval: Interval,
    current: Option<Run>,
    /// Loops that were asked to stop but may still deliver a last sample.
    stopping: Vec<Run>,
}

impl Controller {
    /// Create an idle controller that will spawn its loop on `runtime`.
    pub fn new(sampler: SharedSampler, runtime: Handle, interval: Interval) -> Self {
        let description = match sampler.try_lock() {
            Ok(s) => s.description().to_string(),
            Err(_) => "sampler".to_string(),
        };
        Self {
            sampler,
            description,
            runtime,
            interval,
            current: None,
            stopping: Vec::new(),
        }
    }

    /// Current run state.
    pub fn state(&self) -> RunState {
        if self.current.is_some() {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    /// Returns true while sampling.
    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Returns a description of the sampler in use.
    pub fn sampler_description(&self) -> &str {
        &self.description
    }

    /// Selected interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Change the interval. Ignored while running; returns whether it applied.
    pub fn set_interval(&mut self, interval: Interval) -> bool {
        if self.is_running() {
            return false;
        }
        self.interval = interval;
        true
    }

    /// Lengthen the interval by one second (Idle only).
    pub fn increase_interval(&mut self) -> bool {
        self.set_interval(self.interval.increase())
    }

    /// Shorten the interval by one second (Idle only).
    pub fn decrease_interval(&mut self) -> bool {
        self.set_interval(self.interval.decrease())
    }

    /// Start when idle, stop when running. Returns the new state.
    pub fn toggle(&mut self) -> RunState {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.state()
    }

    /// Spawn the sampling loop. No-op if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.runtime.spawn(run_sampling_loop(
            Arc::clone(&self.sampler),
            self.interval.as_duration(),
            stop_rx,
            tx,
        ));

        info!(interval_secs = self.interval.secs(), "sampling started");
        self.current = Some(Run {
            stop: stop_tx,
            samples: rx,
            handle,
        });
    }

    /// Ask the loop to stop after its current sleep. No-op if idle.
    pub fn stop(&mut self) {
        if let Some(run) = self.current.take() {
            let _ = run.stop.send(true);
            info!("sampling stop requested");
            self.stopping.push(run);
        }
    }

    /// Collect every sample delivered since the last call, oldest first.
    pub fn drain(&mut self) -> Vec<Sample> {
        let mut out = Vec::new();

        self.stopping.retain_mut(|run| run.drain_into(&mut out));

        if let Some(run) = self.current.as_mut() {
            if !run.drain_into(&mut out) {
                warn!("sampling loop ended unexpectedly");
                self.current = None;
            }
        }

        out
    }

    /// Abort every spawned loop without waiting for its sleep.
    ///
    /// Used on quit, where there is nothing left to deliver samples to.
    pub fn shutdown(&mut self) {
        for run in self.current.take().into_iter().chain(self.stopping.drain(..)) {
            run.handle.abort();
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sampler::{Reading, SampleError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::time::Instant;

    /// Sampler that replays a fixed script, then keeps failing.
    #[derive(Debug)]
    pub(crate) struct ScriptedSampler {
        script: VecDeque<Result<Reading, SampleError>>,
        pub(crate) calls: Arc<AtomicU64>,
    }

    impl ScriptedSampler {
        pub(crate) fn new(script: Vec<Result<Reading, SampleError>>) -> Self {
            Self {
                script: script.into(),
                calls: Arc::new(AtomicU64::new(0)),
            }
        }

        pub(crate) fn steady(signal: f64, noise: f64, count: usize) -> Self {
            Self::new((0..count).map(|_| Ok(Reading { signal, noise })).collect())
        }
    }

    #[async_trait]
    impl Sampler for ScriptedSampler {
        async fn sample(&mut self) -> Result<Reading, SampleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .pop_front()
                .unwrap_or_else(|| Err(SampleError::Parse("script exhausted".to_string())))
        }

        fn description(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_interval_bounds() {
        assert_eq!(Interval::new(0), Err(InvalidInterval(0)));
        assert_eq!(Interval::new(11), Err(InvalidInterval(11)));
        assert_eq!(Interval::new(1).unwrap().secs(), 1);
        assert_eq!(Interval::try_from(10).unwrap().as_duration(), Duration::from_secs(10));
        assert_eq!(Interval::default().secs(), 1);
    }

    #[test]
    fn test_interval_steps_saturate() {
        let max = Interval::new(10).unwrap();
        assert_eq!(max.increase(), max);
        assert_eq!(Interval::default().decrease(), Interval::default());
        assert_eq!(Interval::new(4).unwrap().increase().secs(), 5);
        assert_eq!(Interval::new(4).unwrap().decrease().secs(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_mid_interval_waits_for_sleep() {
        let sampler = ScriptedSampler::steady(70.0, 10.0, 10);
        let calls = Arc::clone(&sampler.calls);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();

        let handle = tokio::spawn(run_sampling_loop(
            shared(sampler),
            Duration::from_secs(5),
            stop_rx,
            tx,
        ));

        assert!(rx.recv().await.is_some());
        tokio::time::advance(Duration::from_secs(2)).await;
        stop_tx.send(true).unwrap();

        let delivered = handle.await.unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(started.elapsed() >= Duration::from_secs(5));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_sample_skips_cycle_and_continues() {
        let sampler = ScriptedSampler::new(vec![
            Err(SampleError::Command("airport missing".to_string())),
            Ok(Reading {
                signal: 71.0,
                noise: 14.0,
            }),
            Ok(Reading {
                signal: 65.0,
                noise: 12.0,
            }),
        ]);
        let calls = Arc::clone(&sampler.calls);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(run_sampling_loop(
            shared(sampler),
            Duration::from_secs(1),
            stop_rx,
            tx,
        ));

        assert_eq!(rx.recv().await.unwrap().signal(), 71.0);
        assert_eq!(rx.recv().await.unwrap().signal(), 65.0);
        stop_tx.send(true).unwrap();

        assert_eq!(handle.await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_ends_when_receiver_dropped() {
        let (_stop_tx, stop_rx) = watch::channel(false);
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        let delivered = run_sampling_loop(
            shared(ScriptedSampler::steady(50.0, 5.0, 3)),
            Duration::from_secs(1),
            stop_rx,
            tx,
        )
        .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_toggle_and_interval_lock() {
        let mut controller = Controller::new(
            shared(ScriptedSampler::steady(60.0, 20.0, 100)),
            Handle::current(),
            Interval::default(),
        );
        assert_eq!(controller.state(), RunState::Idle);
        assert_eq!(controller.sampler_description(), "scripted");
        assert!(controller.increase_interval());
        assert_eq!(controller.interval().secs(), 2);

        assert_eq!(controller.toggle(), RunState::Running);
        assert!(!controller.increase_interval());
        assert!(!controller.decrease_interval());
        assert_eq!(controller.interval().secs(), 2);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(controller.drain().len(), 1);

        assert_eq!(controller.toggle(), RunState::Idle);
        assert!(controller.decrease_interval());
        assert_eq!(controller.interval().secs(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_stop_delivers_no_further_samples() {
        let sampler = ScriptedSampler::steady(60.0, 20.0, 100);
        let calls = Arc::clone(&sampler.calls);
        let mut controller =
            Controller::new(shared(sampler), Handle::current(), Interval::new(3).unwrap());

        controller.start();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        controller.stop();
        assert_eq!(controller.state(), RunState::Idle);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(controller.drain().len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(controller.stopping.is_empty());
    }
}
