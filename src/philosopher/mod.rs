//! Philosopher thread implementation
//!
//! A philosopher is the unit of execution at the table. It cycles through
//! thinking, asking the coordinator for its forks, eating, and giving the
//! forks back, recording how long each step took. It never looks at another
//! seat's state; all arbitration happens inside the [`Coordinator`].
//!
//! # Example
//!
//! ```
//! use philosophers::config::timing::{CompletionMode, DelayMode};
//! use philosophers::coordinator::{Coordinator, MonitorCoordinator};
//! use philosophers::distribution::fixed::FixedDelay;
//! use philosophers::philosopher::Philosopher;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! let table: Arc<dyn Coordinator> = Arc::new(MonitorCoordinator::new(2)?);
//! let philosopher = Philosopher::new(
//!     0,
//!     table,
//!     Box::new(FixedDelay::default()),
//!     Box::new(FixedDelay::default()),
//!     DelayMode::Sleep,
//! );
//!
//! let stop = AtomicBool::new(false);
//! let stats = philosopher.run(CompletionMode::Meals { count: 3 }, &stop)?;
//! assert_eq!(stats.meals(), 3);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::config::timing::{CompletionMode, DelayMode};
use crate::config::TimingConfig;
use crate::coordinator::Coordinator;
use crate::distribution::{build_delay_source, DelaySource};
use crate::stats::PhilosopherStats;
use crate::util::time::pause;
use crate::util::verification::ExclusionVerifier;
use crate::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Offset between a seat's think and eat seeds so the two streams differ
const EAT_SEED_OFFSET: u64 = 1_000_003;

/// One seat at the table
pub struct Philosopher {
    id: usize,
    coordinator: Arc<dyn Coordinator>,
    think: Box<dyn DelaySource>,
    eat: Box<dyn DelaySource>,
    mode: DelayMode,
    verifier: Option<Arc<ExclusionVerifier>>,
    stats: PhilosopherStats,
}

impl Philosopher {
    pub fn new(
        id: usize,
        coordinator: Arc<dyn Coordinator>,
        think: Box<dyn DelaySource>,
        eat: Box<dyn DelaySource>,
        mode: DelayMode,
    ) -> Self {
        Self {
            id,
            coordinator,
            think,
            eat,
            mode,
            verifier: None,
            stats: PhilosopherStats::new(id),
        }
    }

    /// Build seat `id` with delay sources from `timing`
    ///
    /// With a base seed, seat `id` thinks with `seed + id` and eats with
    /// `seed + id + 1_000_003`, so runs are reproducible and no two streams
    /// at the table coincide.
    pub fn from_timing(
        id: usize,
        coordinator: Arc<dyn Coordinator>,
        timing: &TimingConfig,
    ) -> Result<Self> {
        let think_seed = timing.seed.map(|s| s.wrapping_add(id as u64));
        let eat_seed = think_seed.map(|s| s.wrapping_add(EAT_SEED_OFFSET));

        let think = build_delay_source(&timing.think, think_seed)?;
        let eat = build_delay_source(&timing.eat, eat_seed)?;

        Ok(Self::new(id, coordinator, think, eat, timing.mode))
    }

    /// Report every meal to `verifier`
    pub fn with_verifier(mut self, verifier: Arc<ExclusionVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Dine until `completion` is reached or `stop` is raised
    ///
    /// `stop` is only checked between steps, never while holding forks, so a
    /// philosopher always finishes its current meal and releases before
    /// leaving.
    pub fn run(mut self, completion: CompletionMode, stop: &AtomicBool) -> Result<PhilosopherStats> {
        let seats = self.coordinator.philosophers();
        if self.id >= seats {
            anyhow::bail!(
                "Philosopher {} does not exist at a table of {}",
                self.id,
                seats
            );
        }

        let start = Instant::now();
        debug!(philosopher = self.id, %completion, "sitting down");

        while !self.should_stop(completion, start, stop) {
            let delay = self.think.next_delay();
            debug!(philosopher = self.id, ?delay, "thinking");
            let thought = pause(delay, self.mode);
            self.stats.record_think(thought);

            if self.should_stop(completion, start, stop) {
                break;
            }

            debug!(philosopher = self.id, "hungry");
            let asked = Instant::now();
            self.coordinator.request(self.id);
            let waited = asked.elapsed();
            self.stats.record_wait(waited);

            if let Some(ref verifier) = self.verifier {
                verifier.enter(self.id);
            }

            let delay = self.eat.next_delay();
            debug!(philosopher = self.id, ?delay, ?waited, "eating");
            let ate = pause(delay, self.mode);

            if let Some(ref verifier) = self.verifier {
                verifier.leave(self.id);
            }
            self.coordinator.release(self.id);
            self.stats.record_meal(ate);
            trace!(philosopher = self.id, meals = self.stats.meals(), "released forks");
        }

        debug!(
            philosopher = self.id,
            meals = self.stats.meals(),
            elapsed = ?start.elapsed(),
            "leaving the table"
        );
        Ok(self.stats)
    }

    fn should_stop(&self, completion: CompletionMode, start: Instant, stop: &AtomicBool) -> bool {
        if stop.load(Ordering::Relaxed) {
            return true;
        }
        match completion {
            CompletionMode::Meals { count } => self.stats.meals() >= count,
            CompletionMode::Duration { millis } => start.elapsed() >= Duration::from_millis(millis),
            CompletionMode::Forever => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::timing::DelayConfig;
    use crate::coordinator::{HierarchyCoordinator, MonitorCoordinator};
    use crate::distribution::fixed::FixedDelay;
    use std::thread;

    fn quick(id: usize, coordinator: Arc<dyn Coordinator>) -> Philosopher {
        Philosopher::new(
            id,
            coordinator,
            Box::new(FixedDelay::default()),
            Box::new(FixedDelay::from_micros(100)),
            DelayMode::Sleep,
        )
    }

    #[test]
    fn test_run_meals_alone() {
        let table: Arc<dyn Coordinator> = Arc::new(MonitorCoordinator::new(3).unwrap());
        let stop = AtomicBool::new(false);

        let stats = quick(1, table).run(CompletionMode::Meals { count: 5 }, &stop).unwrap();
        assert_eq!(stats.id(), 1);
        assert_eq!(stats.meals(), 5);
        assert_eq!(stats.wait_latency().len(), 5);
        assert!(stats.eat_time() >= Duration::from_micros(500));
    }

    #[test]
    fn test_run_respects_stop_flag() {
        let table: Arc<dyn Coordinator> = Arc::new(MonitorCoordinator::new(2).unwrap());
        let stop = AtomicBool::new(true);

        let stats = quick(0, table).run(CompletionMode::Forever, &stop).unwrap();
        assert_eq!(stats.meals(), 0);
    }

    #[test]
    fn test_run_duration() {
        let table: Arc<dyn Coordinator> = Arc::new(HierarchyCoordinator::new(2).unwrap());
        let stop = AtomicBool::new(false);

        let start = Instant::now();
        let stats = quick(0, table)
            .run(CompletionMode::Duration { millis: 30 }, &stop)
            .unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(stats.meals() > 0);
    }

    #[test]
    fn test_run_rejects_missing_seat() {
        let table: Arc<dyn Coordinator> = Arc::new(MonitorCoordinator::new(2).unwrap());
        let stop = AtomicBool::new(false);

        let err = quick(2, table)
            .run(CompletionMode::Meals { count: 1 }, &stop)
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_full_table_with_verifier() {
        for coordinator in [
            Arc::new(MonitorCoordinator::new(5).unwrap()) as Arc<dyn Coordinator>,
            Arc::new(HierarchyCoordinator::new(5).unwrap()) as Arc<dyn Coordinator>,
        ] {
            let verifier = Arc::new(ExclusionVerifier::new(5));
            let stop = Arc::new(AtomicBool::new(false));

            let handles: Vec<_> = (0..5)
                .map(|id| {
                    let philosopher =
                        quick(id, Arc::clone(&coordinator)).with_verifier(Arc::clone(&verifier));
                    let stop = Arc::clone(&stop);
                    thread::spawn(move || {
                        philosopher.run(CompletionMode::Meals { count: 20 }, &stop)
                    })
                })
                .collect();

            for handle in handles {
                let stats = handle.join().unwrap().unwrap();
                assert_eq!(stats.meals(), 20);
            }
            assert_eq!(verifier.violations(), 0);
        }
    }

    #[test]
    fn test_seeded_timing_is_reproducible() {
        let timing = TimingConfig {
            think: DelayConfig::Uniform { min_us: 0, max_us: 1_000_000 },
            eat: DelayConfig::Uniform { min_us: 0, max_us: 1_000_000 },
            mode: DelayMode::Sleep,
            seed: Some(42),
        };
        let table: Arc<dyn Coordinator> = Arc::new(MonitorCoordinator::new(3).unwrap());

        let mut a = Philosopher::from_timing(1, Arc::clone(&table), &timing).unwrap();
        let mut b = Philosopher::from_timing(1, Arc::clone(&table), &timing).unwrap();
        let mut c = Philosopher::from_timing(2, table, &timing).unwrap();

        let seq_a: Vec<_> = (0..8).map(|_| a.think.next_delay()).collect();
        let seq_b: Vec<_> = (0..8).map(|_| b.think.next_delay()).collect();
        let seq_c: Vec<_> = (0..8).map(|_| c.think.next_delay()).collect();
        let eat_a: Vec<_> = (0..8).map(|_| a.eat.next_delay()).collect();

        assert_eq!(seq_a, seq_b);
        assert_ne!(seq_a, seq_c);
        assert_ne!(seq_a, eat_a);
    }
}
