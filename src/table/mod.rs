//! Dinner orchestration
//!
//! The table owns one dinner from start to finish: it builds the coordinator
//! chosen in the config, seats one thread per philosopher, enforces the
//! completion mode, and folds the results into [`TableStats`].

use crate::config::timing::CompletionMode;
use crate::config::Config;
use crate::coordinator::{build_coordinator, EventSink, TableEvent};
use crate::philosopher::Philosopher;
use crate::stats::{PhilosopherStats, TableStats};
use crate::util::verification::ExclusionVerifier;
use crate::Result;
use anyhow::{anyhow, Context};
use crossbeam::channel::Receiver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How often the table looks at the clock while a timed dinner runs
const DEADLINE_POLL: Duration = Duration::from_millis(10);

/// Events the counter thread may fall behind by before coordinators wait on it
const EVENT_BACKLOG: usize = 4096;

/// One dinner
pub struct Table {
    config: Config,
    stop: Arc<AtomicBool>,
}

impl Table {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that ends the dinner early when raised
    ///
    /// Philosophers finish the step they are in, so anyone eating releases
    /// first.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the dinner to completion
    ///
    /// Fails if a philosopher thread panics or, with verification on, if two
    /// neighbors were ever seen eating together.
    pub fn run(&self) -> Result<TableStats> {
        let table = &self.config.table;
        info!(
            philosophers = table.philosophers,
            strategy = %table.strategy,
            completion = %self.config.completion,
            "setting the table"
        );

        let (sink, events) = EventSink::bounded(EVENT_BACKLOG);
        let coordinator =
            build_coordinator(table, Some(sink)).context("Failed to build coordinator")?;
        let event_counter = spawn_event_counter(events)?;

        let verifier = self
            .config
            .runtime
            .verify
            .then(|| Arc::new(ExclusionVerifier::new(table.philosophers)));

        let mut philosophers = Vec::with_capacity(table.philosophers);
        for id in 0..table.philosophers {
            let mut philosopher =
                Philosopher::from_timing(id, Arc::clone(&coordinator), &self.config.timing)
                    .with_context(|| format!("Failed to seat philosopher {}", id))?;
            if let Some(ref verifier) = verifier {
                philosopher = philosopher.with_verifier(Arc::clone(verifier));
            }
            philosophers.push(philosopher);
        }

        let start = Instant::now();
        let mut handles = Vec::with_capacity(philosophers.len());
        for philosopher in philosophers {
            let id = philosopher.id();
            let stop = Arc::clone(&self.stop);
            let completion = self.config.completion;
            let handle = thread::Builder::new()
                .name(format!("philosopher-{}", id))
                .spawn(move || philosopher.run(completion, &stop))
                .with_context(|| format!("Failed to spawn thread for philosopher {}", id))?;
            handles.push(handle);
        }

        if let CompletionMode::Duration { millis } = self.config.completion {
            self.wait_for_deadline(&handles, start + Duration::from_millis(millis));
        }

        let stats = join_philosophers(handles)?;
        let elapsed = start.elapsed();

        // Last sender goes with the coordinator, which ends the counter
        drop(coordinator);
        let (grants, promotions) = event_counter
            .join()
            .map_err(|_| anyhow!("Event counter thread panicked"))?;

        if let Some(ref verifier) = verifier {
            let violations = verifier.violations();
            if violations > 0 {
                anyhow::bail!(
                    "Exclusion verifier saw {} violation(s): neighbors ate together",
                    violations
                );
            }
        }

        let stats = TableStats::new(stats, elapsed)?.with_event_counts(grants, promotions);
        info!(
            meals = stats.total_meals(),
            elapsed = ?elapsed,
            fairness = stats.fairness_index(),
            "dinner finished"
        );
        Ok(stats)
    }

    fn wait_for_deadline(&self, handles: &[JoinHandle<Result<PhilosopherStats>>], deadline: Instant) {
        loop {
            if handles.iter().all(|h| h.is_finished()) {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(DEADLINE_POLL.min(deadline - now));
        }
        self.stop.store(true, Ordering::Relaxed);
    }
}

fn join_philosophers(
    handles: Vec<JoinHandle<Result<PhilosopherStats>>>,
) -> Result<Vec<PhilosopherStats>> {
    let mut results = Vec::with_capacity(handles.len());
    for (id, handle) in handles.into_iter().enumerate() {
        let stats = handle
            .join()
            .map_err(|_| anyhow!("Philosopher thread {} panicked", id))?
            .with_context(|| format!("Philosopher {} failed", id))?;
        results.push(stats);
    }
    Ok(results)
}

/// Count grants and starvation promotions until every sender is gone
///
/// The hierarchy has no grant event; a grant there is a pair of fork
/// pickups.
fn spawn_event_counter(events: Receiver<TableEvent>) -> Result<JoinHandle<(u64, u64)>> {
    thread::Builder::new()
        .name("table-events".to_string())
        .spawn(move || {
            let (mut grants, mut pickups, mut promotions) = (0u64, 0u64, 0u64);
            for event in events.iter() {
                match event {
                    TableEvent::Granted { .. } => grants += 1,
                    TableEvent::ForkAcquired { .. } => pickups += 1,
                    TableEvent::Starving { id } => {
                        promotions += 1;
                        if promotions == 1 {
                            warn!(philosopher = id, "first starvation promotion at the table");
                        }
                    }
                    _ => {}
                }
            }
            (grants + pickups / 2, promotions)
        })
        .context("Failed to spawn event counter thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::timing::DelayConfig;
    use crate::coordinator::Strategy;

    fn fast_config(strategy: Strategy, philosophers: usize) -> Config {
        let mut config = Config::default();
        config.table.philosophers = philosophers;
        config.table.strategy = strategy;
        config.timing.think = DelayConfig::Uniform { min_us: 0, max_us: 200 };
        config.timing.eat = DelayConfig::Uniform { min_us: 50, max_us: 300 };
        config.timing.seed = Some(7);
        config.completion = CompletionMode::Meals { count: 15 };
        config.runtime.verify = true;
        config
    }

    #[test]
    fn test_monitor_dinner_completes() {
        let stats = Table::new(fast_config(Strategy::Monitor, 5)).run().unwrap();
        assert_eq!(stats.philosophers().len(), 5);
        assert_eq!(stats.total_meals(), 75);
        assert_eq!(stats.min_meals(), 15);
        assert_eq!(stats.max_meals(), 15);
        // Every meal was granted through the event stream
        assert_eq!(stats.grants(), 75);
        assert_eq!(stats.wait_latency().len(), 75);
    }

    #[test]
    fn test_hierarchy_dinner_completes() {
        let stats = Table::new(fast_config(Strategy::Hierarchy, 5)).run().unwrap();
        assert_eq!(stats.total_meals(), 75);
        assert!((stats.fairness_index() - 1.0).abs() < 1e-9);
        assert_eq!(stats.grants(), 75);
    }

    #[test]
    fn test_event_backlog_overflow() {
        // Far more transitions than the event channel holds at once
        for strategy in [Strategy::Monitor, Strategy::Hierarchy] {
            let mut config = fast_config(strategy, 5);
            config.timing.think = DelayConfig::Fixed { us: 0 };
            config.timing.eat = DelayConfig::Fixed { us: 0 };
            config.completion = CompletionMode::Meals { count: 1000 };

            let stats = Table::new(config).run().unwrap();
            assert_eq!(stats.total_meals(), 5000);
            assert_eq!(stats.grants(), 5000);
        }
    }

    #[test]
    fn test_two_seats_each_strategy() {
        for strategy in [Strategy::Monitor, Strategy::Hierarchy] {
            let stats = Table::new(fast_config(strategy, 2)).run().unwrap();
            assert_eq!(stats.total_meals(), 30);
        }
    }

    #[test]
    fn test_starvation_guard_dinner() {
        let mut config = fast_config(Strategy::Monitor, 6);
        config.table.starvation_threshold = Some(1);
        let stats = Table::new(config).run().unwrap();
        assert_eq!(stats.total_meals(), 90);
    }

    #[test]
    fn test_duration_dinner_stops() {
        let mut config = fast_config(Strategy::Monitor, 4);
        config.completion = CompletionMode::Duration { millis: 100 };

        let start = Instant::now();
        let stats = Table::new(config).run().unwrap();
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(stats.total_meals() > 0);
    }

    #[test]
    fn test_stop_handle_ends_forever_dinner() {
        let mut config = fast_config(Strategy::Hierarchy, 3);
        config.completion = CompletionMode::Forever;

        let table = Table::new(config);
        let stop = table.stop_handle();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            stop.store(true, Ordering::Relaxed);
        });

        let stats = table.run().unwrap();
        stopper.join().unwrap();
        assert!(stats.total_meals() > 0);
    }

    #[test]
    fn test_rejects_single_seat() {
        let err = Table::new(fast_config(Strategy::Monitor, 1)).run().unwrap_err();
        assert!(err.to_string().contains("Failed to build coordinator"));
    }
}
