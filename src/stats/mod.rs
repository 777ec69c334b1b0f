//! Statistics collection
//!
//! Each philosopher thread owns one [`PhilosopherStats`] and hands it back when
//! it leaves the table, so recording never contends with other seats. The
//! table then folds every seat into a [`aggregator::TableStats`].
//!
//! # Example
//!
//! ```
//! use philosophers::stats::PhilosopherStats;
//! use std::time::Duration;
//!
//! let mut stats = PhilosopherStats::new(0);
//! stats.record_think(Duration::from_millis(3));
//! stats.record_wait(Duration::from_micros(250));
//! stats.record_meal(Duration::from_millis(2));
//!
//! assert_eq!(stats.meals(), 1);
//! assert_eq!(stats.longest_wait(), Duration::from_micros(250));
//! ```

pub mod aggregator;
pub mod histogram;

pub use aggregator::TableStats;

use histogram::LatencyHistogram;
use std::time::Duration;

/// What one philosopher did during a dinner
#[derive(Debug, Clone)]
pub struct PhilosopherStats {
    id: usize,
    meals: u64,
    think_time: Duration,
    eat_time: Duration,
    wait_time: Duration,
    longest_wait: Duration,
    wait_latency: LatencyHistogram,
}

impl PhilosopherStats {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            meals: 0,
            think_time: Duration::ZERO,
            eat_time: Duration::ZERO,
            wait_time: Duration::ZERO,
            longest_wait: Duration::ZERO,
            wait_latency: LatencyHistogram::new(),
        }
    }

    #[inline]
    pub fn record_think(&mut self, elapsed: Duration) {
        self.think_time += elapsed;
    }

    /// Record the time between asking for forks and getting them
    #[inline]
    pub fn record_wait(&mut self, elapsed: Duration) {
        self.wait_time += elapsed;
        self.longest_wait = self.longest_wait.max(elapsed);
        self.wait_latency.record(elapsed);
    }

    /// Record a finished meal
    #[inline]
    pub fn record_meal(&mut self, elapsed: Duration) {
        self.eat_time += elapsed;
        self.meals += 1;
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn meals(&self) -> u64 {
        self.meals
    }

    pub fn think_time(&self) -> Duration {
        self.think_time
    }

    pub fn eat_time(&self) -> Duration {
        self.eat_time
    }

    pub fn wait_time(&self) -> Duration {
        self.wait_time
    }

    pub fn longest_wait(&self) -> Duration {
        self.longest_wait
    }

    pub fn wait_latency(&self) -> &LatencyHistogram {
        &self.wait_latency
    }

    /// Average wait per granted request
    pub fn mean_wait(&self) -> Duration {
        let samples = self.wait_latency.len();
        if samples == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos((self.wait_time.as_nanos() / samples as u128) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_empty() {
        let stats = PhilosopherStats::new(3);
        assert_eq!(stats.id(), 3);
        assert_eq!(stats.meals(), 0);
        assert_eq!(stats.wait_time(), Duration::ZERO);
        assert_eq!(stats.mean_wait(), Duration::ZERO);
        assert!(stats.wait_latency().is_empty());
    }

    #[test]
    fn test_record_cycle() {
        let mut stats = PhilosopherStats::new(0);
        for wait_ms in [1, 5, 3] {
            stats.record_think(Duration::from_millis(10));
            stats.record_wait(Duration::from_millis(wait_ms));
            stats.record_meal(Duration::from_millis(20));
        }

        assert_eq!(stats.meals(), 3);
        assert_eq!(stats.think_time(), Duration::from_millis(30));
        assert_eq!(stats.eat_time(), Duration::from_millis(60));
        assert_eq!(stats.wait_time(), Duration::from_millis(9));
        assert_eq!(stats.longest_wait(), Duration::from_millis(5));
        assert_eq!(stats.mean_wait(), Duration::from_millis(3));
        assert_eq!(stats.wait_latency().len(), 3);
    }
}
