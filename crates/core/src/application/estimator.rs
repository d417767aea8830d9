// Processing Time Estimator
// Bounded rolling window of observed job durations. Feeds the wait-time
// projection in the status API; resets on process restart.

use crate::application::constants::DEFAULT_ESTIMATE_MS;
use std::collections::VecDeque;

pub struct ProcessingTimeEstimator {
    samples: VecDeque<i64>,
    max_samples: usize,
}

impl ProcessingTimeEstimator {
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_samples),
            max_samples,
        }
    }

    /// Append an observed duration, evicting the oldest sample once the
    /// window is full. Recorded for successes and failures alike.
    pub fn record(&mut self, duration_ms: i64) {
        if self.samples.len() == self.max_samples {
            self.samples.pop_front();
        }
        self.samples.push_back(duration_ms);
    }

    /// Arithmetic mean of the current window, or the fixed default when no
    /// job has settled yet.
    pub fn estimate(&self) -> i64 {
        if self.samples.is_empty() {
            return DEFAULT_ESTIMATE_MS;
        }
        let sum: i64 = self.samples.iter().sum();
        sum / self.samples.len() as i64
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_falls_back_to_default() {
        let estimator = ProcessingTimeEstimator::new(50);
        assert_eq!(estimator.estimate(), DEFAULT_ESTIMATE_MS);
    }

    #[test]
    fn estimate_is_mean_of_samples() {
        let mut estimator = ProcessingTimeEstimator::new(50);
        estimator.record(1000);
        estimator.record(2000);
        estimator.record(3000);
        assert_eq!(estimator.estimate(), 2000);
    }

    #[test]
    fn window_evicts_oldest_sample() {
        let mut estimator = ProcessingTimeEstimator::new(3);
        estimator.record(10_000);
        estimator.record(100);
        estimator.record(100);
        estimator.record(100); // evicts 10_000
        assert_eq!(estimator.sample_count(), 3);
        assert_eq!(estimator.estimate(), 100);
    }
}
