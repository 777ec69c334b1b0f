//! Resource-hierarchy coordinator
//!
//! Every fork is its own exclusive lock. Forks are numbered `0..n` once, at
//! construction, and every philosopher picks up the lower-numbered of its two
//! forks first and puts the higher-numbered one down first.
//!
//! Seat `i` sits between forks `i` and `(i + 1) % n`. For every seat but the
//! last this already is low-then-high. The last seat sits between fork `n - 1`
//! and fork `0`; its pair is reversed to `(0, n - 1)` when the table is laid,
//! which is what breaks the ring:
//!
//! ```text
//! seat:   0       1       2       3       4
//! pair: (0,1)   (1,2)   (2,3)   (3,4)   (0,4)   <- reversed
//! ```
//!
//! With all acquisitions in increasing order there is no cycle in the
//! waits-for graph: whoever holds the highest-numbered fork in a chain of
//! waiters is never waiting on a lower one.
//!
//! No fairness is promised beyond what the fork locks give.

use super::{
    check_table_size, Coordinator, CoordinatorError, EventSink, Strategy, TableEvent,
};
use serde::Serialize;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// The two forks one seat needs, in pick-up order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForkPair {
    pub low: usize,
    pub high: usize,
}

impl ForkPair {
    pub fn new(low: usize, high: usize) -> Self {
        Self { low, high }
    }

    /// Ordered pair for `seat` at a table of `forks`
    pub fn for_seat(seat: usize, forks: usize) -> Self {
        let left = seat;
        let right = (seat + 1) % forks;
        if left < right {
            Self::new(left, right)
        } else {
            // Wraparound seat
            Self::new(right, left)
        }
    }

    fn validate(&self, seat: usize, forks: usize) -> Result<(), CoordinatorError> {
        for fork in [self.low, self.high] {
            if fork >= forks {
                return Err(CoordinatorError::ForkOutOfRange {
                    actor: seat,
                    fork,
                    forks,
                });
            }
        }

        if self.low >= self.high {
            return Err(CoordinatorError::UnorderedPair {
                actor: seat,
                low: self.low,
                high: self.high,
            });
        }

        if *self != Self::for_seat(seat, forks) {
            return Err(CoordinatorError::NotAdjacent {
                actor: seat,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }
}

impl fmt::Display for ForkPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// One exclusive fork
///
/// A binary semaphore that remembers who holds it, so a release by anyone else
/// can be caught.
#[derive(Debug)]
struct Fork {
    holder: Mutex<Option<usize>>,
    freed: Condvar,
}

impl Fork {
    fn new() -> Self {
        Self {
            holder: Mutex::new(None),
            freed: Condvar::new(),
        }
    }

    fn lock_holder(&self) -> MutexGuard<'_, Option<usize>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the fork is free, then take it
    fn pick_up(&self, index: usize, seat: usize, events: Option<&EventSink>) {
        let mut holder = self.lock_holder();
        while holder.is_some() {
            holder = self.freed.wait(holder).unwrap_or_else(PoisonError::into_inner);
        }
        *holder = Some(seat);

        if let Some(sink) = events {
            sink.emit(TableEvent::ForkAcquired { id: seat, fork: index });
        }
        trace!(seat, fork = index, "picked up fork");
    }

    /// Put the fork down
    ///
    /// # Panics
    ///
    /// Panics if `seat` is not holding it.
    fn put_down(&self, index: usize, seat: usize, events: Option<&EventSink>) {
        let mut holder = self.lock_holder();
        match *holder {
            Some(owner) if owner == seat => {}
            Some(owner) => panic!(
                "philosopher {} put down fork {} held by philosopher {}",
                seat, index, owner
            ),
            None => panic!(
                "philosopher {} put down fork {} which nobody holds",
                seat, index
            ),
        }
        *holder = None;

        if let Some(sink) = events {
            sink.emit(TableEvent::ForkReleased { id: seat, fork: index });
        }
        trace!(seat, fork = index, "put down fork");

        self.freed.notify_one();
    }

    fn holder(&self) -> Option<usize> {
        *self.lock_holder()
    }
}

/// Coordinator that orders fork acquisition to rule out circular waits
#[derive(Debug)]
pub struct HierarchyCoordinator {
    forks: Vec<Fork>,
    pairs: Vec<ForkPair>,
    events: Option<EventSink>,
}

impl HierarchyCoordinator {
    /// Lay a table of `philosophers` seats and as many forks
    ///
    /// # Errors
    ///
    /// Fails with [`CoordinatorError::TooFewPhilosophers`] below two seats.
    pub fn new(philosophers: usize) -> Result<Self, CoordinatorError> {
        check_table_size(philosophers)?;
        let pairs = (0..philosophers)
            .map(|seat| ForkPair::for_seat(seat, philosophers))
            .collect();
        Self::with_fork_pairs(pairs)
    }

    /// Lay a table from an explicit pair per seat
    ///
    /// Every pair must be strictly increasing, in range, and name exactly the
    /// two forks beside its seat. In particular the wraparound seat must use
    /// `(0, n - 1)`; `(n - 1, 0)` is rejected since it permits deadlock.
    pub fn with_fork_pairs(pairs: Vec<ForkPair>) -> Result<Self, CoordinatorError> {
        let forks = pairs.len();
        check_table_size(forks)?;

        for (seat, pair) in pairs.iter().enumerate() {
            pair.validate(seat, forks)?;
        }

        Ok(Self {
            forks: (0..forks).map(|_| Fork::new()).collect(),
            pairs,
            events: None,
        })
    }

    /// Publish every fork pick-up and put-down to `sink`
    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Pick-up order for `seat`
    pub fn fork_pair(&self, seat: usize) -> ForkPair {
        self.pairs[seat]
    }

    /// Current holder of each fork
    pub fn holders(&self) -> Vec<Option<usize>> {
        self.forks.iter().map(Fork::holder).collect()
    }

    /// Pick up the low fork, then the high fork, blocking on each
    pub fn acquire_both(&self, seat: usize) {
        let pair = self.pair_for(seat);
        let events = self.events.as_ref();
        self.forks[pair.low].pick_up(pair.low, seat, events);
        self.forks[pair.high].pick_up(pair.high, seat, events);
    }

    /// Put down the high fork, then the low fork
    ///
    /// # Panics
    ///
    /// Panics if `seat` does not hold both forks.
    pub fn release_both(&self, seat: usize) {
        let pair = self.pair_for(seat);
        let events = self.events.as_ref();
        self.forks[pair.high].put_down(pair.high, seat, events);
        self.forks[pair.low].put_down(pair.low, seat, events);
    }

    fn pair_for(&self, seat: usize) -> ForkPair {
        assert!(
            seat < self.pairs.len(),
            "philosopher {} does not exist at a table of {}",
            seat,
            self.pairs.len()
        );
        self.pairs[seat]
    }
}

impl Coordinator for HierarchyCoordinator {
    fn strategy(&self) -> Strategy {
        Strategy::Hierarchy
    }

    fn philosophers(&self) -> usize {
        self.pairs.len()
    }

    fn request(&self, id: usize) {
        self.acquire_both(id);
    }

    fn release(&self, id: usize) {
        self.release_both(id);
    }
}
