//! Statistics aggregation
//!
//! Folds the per-seat statistics of one dinner into a table-wide view while
//! keeping every seat's own numbers for the detailed report.
//!
//! # Fairness
//!
//! Meal distribution is scored with Jain's fairness index,
//! `(sum x)^2 / (n * sum x^2)` over the meal counts. It is 1.0 when every
//! seat ate equally often and falls towards `1/n` as one seat takes
//! everything.

use crate::stats::histogram::LatencyHistogram;
use crate::stats::PhilosopherStats;
use crate::Result;
use std::time::Duration;

/// Aggregate results of one dinner
#[derive(Debug, Clone)]
pub struct TableStats {
    philosophers: Vec<PhilosopherStats>,
    wait_latency: LatencyHistogram,
    elapsed: Duration,
    grants: u64,
    starvation_promotions: u64,
}

impl TableStats {
    /// Build from every seat's stats and the wall-clock length of the dinner
    ///
    /// Seats are reordered by id.
    pub fn new(mut philosophers: Vec<PhilosopherStats>, elapsed: Duration) -> Result<Self> {
        philosophers.sort_by_key(|p| p.id());

        let mut wait_latency = LatencyHistogram::new();
        for p in &philosophers {
            wait_latency.merge(p.wait_latency())?;
        }

        Ok(Self {
            philosophers,
            wait_latency,
            elapsed,
            grants: 0,
            starvation_promotions: 0,
        })
    }

    /// Attach counts observed on the coordinator's event stream
    pub fn with_event_counts(mut self, grants: u64, starvation_promotions: u64) -> Self {
        self.grants = grants;
        self.starvation_promotions = starvation_promotions;
        self
    }

    pub fn philosophers(&self) -> &[PhilosopherStats] {
        &self.philosophers
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Merged wait latency across all seats
    pub fn wait_latency(&self) -> &LatencyHistogram {
        &self.wait_latency
    }

    /// Permissions handed out by the coordinator
    pub fn grants(&self) -> u64 {
        self.grants
    }

    /// Times a hungry seat was promoted to starving
    pub fn starvation_promotions(&self) -> u64 {
        self.starvation_promotions
    }

    pub fn total_meals(&self) -> u64 {
        self.philosophers.iter().map(|p| p.meals()).sum()
    }

    pub fn min_meals(&self) -> u64 {
        self.philosophers.iter().map(|p| p.meals()).min().unwrap_or(0)
    }

    pub fn max_meals(&self) -> u64 {
        self.philosophers.iter().map(|p| p.meals()).max().unwrap_or(0)
    }

    /// Longest single wait at the table
    pub fn longest_wait(&self) -> Duration {
        self.philosophers
            .iter()
            .map(|p| p.longest_wait())
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Meals per second of wall-clock time
    pub fn meals_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.total_meals() as f64 / secs
        } else {
            0.0
        }
    }

    /// Jain's fairness index over meal counts
    ///
    /// A table where nobody ate is trivially fair (1.0).
    pub fn fairness_index(&self) -> f64 {
        jain_index(self.philosophers.iter().map(|p| p.meals() as f64))
    }
}

fn jain_index(values: impl Iterator<Item = f64>) -> f64 {
    let (mut n, mut sum, mut sum_sq) = (0usize, 0.0f64, 0.0f64);
    for x in values {
        n += 1;
        sum += x;
        sum_sq += x * x;
    }
    if n == 0 || sum_sq == 0.0 {
        return 1.0;
    }
    (sum * sum) / (n as f64 * sum_sq)
}
