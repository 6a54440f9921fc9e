//! Sample history and the running noise average for the current run.

use std::collections::VecDeque;

use super::sample::Sample;

/// Default number of samples kept in memory (one hour at 1s intervals).
pub const DEFAULT_CAPACITY: usize = 3600;

/// Decayed average of the noise series.
///
/// Seeded by the first value, then `avg = (avg + value) / 2` for every
/// following value. This is an exponential decay with a fixed weight of
/// 0.5, not an arithmetic mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningAverage {
    value: Option<f64>,
}

impl RunningAverage {
    /// Create an empty average.
    pub fn new() -> Self {
        Self { value: None }
    }

    /// Fold in a new value and return the updated average.
    pub fn update(&mut self, value: f64) -> f64 {
        let next = match self.value {
            None => value,
            Some(avg) => (avg + value) / 2.0,
        };
        self.value = Some(next);
        next
    }

    /// Current average, or `None` before the first value.
    pub fn get(&self) -> Option<f64> {
        self.value
    }
}

/// Ordered samples for the current run.
///
/// History only grows; there is no reset. Once `capacity` samples are held
/// the oldest one is dropped for each new one, but [`History::total`] and
/// the x positions handed to the chart keep counting from the first sample
/// of the process.
#[derive(Debug, Clone)]
pub struct History {
    samples: VecDeque<Sample>,
    capacity: usize,
    total: u64,
    noise_average: RunningAverage,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create a new empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new empty history that keeps at most `capacity` samples.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            total: 0,
            noise_average: RunningAverage::new(),
        }
    }

    /// Record a new sample and return the updated history.
    pub fn record(&mut self, sample: Sample) -> &Self {
        self.noise_average.update(sample.noise());
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        self.total += 1;
        self
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples held in memory.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of samples recorded since the process started.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The most recent sample.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Running average of the noise series.
    pub fn noise_average(&self) -> Option<f64> {
        self.noise_average.get()
    }

    /// Iterate over the held samples, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Absolute reading index of the oldest held sample.
    pub fn first_index(&self) -> u64 {
        self.total - self.samples.len() as u64
    }

    /// Chart points `(reading index, signal %)`.
    pub fn signal_points(&self) -> Vec<(f64, f64)> {
        self.points(Sample::signal)
    }

    /// Chart points `(reading index, noise %)`.
    pub fn noise_points(&self) -> Vec<(f64, f64)> {
        self.points(Sample::noise)
    }

    fn points(&self, value: impl Fn(&Sample) -> f64) -> Vec<(f64, f64)> {
        let first = self.first_index();
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| ((first + i as u64) as f64, value(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn sample(signal: f64, noise: f64) -> Sample {
        Sample::new(signal, noise, Local::now())
    }

    #[test]
    fn test_running_average_seeded_by_first_value() {
        let mut avg = RunningAverage::new();
        assert_eq!(avg.get(), None);
        assert_eq!(avg.update(20.0), 20.0);
        assert_eq!(avg.get(), Some(20.0));
    }

    #[test]
    fn test_running_average_decay_recurrence() {
        let noise = [20.0, 40.0, 10.0, 70.0, 5.0];
        let mut avg = RunningAverage::new();
        let results: Vec<f64> = noise.iter().map(|&n| avg.update(n)).collect();

        assert_eq!(results[0], 20.0);
        assert_eq!(results[1], (20.0 + 40.0) / 2.0);
        assert_eq!(results[2], ((20.0 + 40.0) / 2.0 + 10.0) / 2.0);
        assert_eq!(results[3], (((20.0 + 40.0) / 2.0 + 10.0) / 2.0 + 70.0) / 2.0);
        assert_eq!(results[4], (results[3] + 5.0) / 2.0);

        // Not the arithmetic mean
        let mean: f64 = noise[..4].iter().sum::<f64>() / 4.0;
        assert_ne!(results[3], mean);
    }

    #[test]
    fn test_history_tracks_noise_average() {
        let mut history = History::new();
        history.record(sample(80.0, 10.0));
        history.record(sample(75.0, 30.0));
        history.record(sample(70.0, 50.0));
        assert_eq!(history.noise_average(), Some(35.0));
    }

    #[test]
    fn test_history_length_grows_with_each_record() {
        let mut history = History::new();
        assert!(history.is_empty());
        for k in 1..=25 {
            let len = history.record(sample(50.0, 10.0)).len();
            assert_eq!(len, k);
            assert_eq!(history.total(), k as u64);
        }
    }

    #[test]
    fn test_history_capacity_evicts_oldest() {
        let mut history = History::with_capacity(3);
        for i in 0..5 {
            history.record(sample(i as f64, 0.0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.total(), 5);
        assert_eq!(history.first_index(), 2);

        let points = history.signal_points();
        assert_eq!(points, vec![(2.0, 2.0), (3.0, 3.0), (4.0, 4.0)]);
    }

    #[test]
    fn test_history_average_survives_eviction() {
        let mut history = History::with_capacity(1);
        history.record(sample(0.0, 40.0));
        history.record(sample(0.0, 20.0));
        assert_eq!(history.len(), 1);
        assert_eq!(history.noise_average(), Some(30.0));
    }

    #[test]
    fn test_chart_points_follow_reading_index() {
        let mut history = History::new();
        history.record(sample(71.0, 14.0));
        history.record(sample(65.0, 12.0));
        assert_eq!(history.signal_points(), vec![(0.0, 71.0), (1.0, 65.0)]);
        assert_eq!(history.noise_points(), vec![(0.0, 14.0), (1.0, 12.0)]);
        assert_eq!(history.latest().map(|s| s.margin()), Some(53.0));
    }
}
