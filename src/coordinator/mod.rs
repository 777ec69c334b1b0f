//! Coordinator module
//!
//! A coordinator is the single synchronization authority for one dinner. Every
//! philosopher thread calls into it to get permission to eat and to give that
//! permission back; no philosopher ever touches another philosopher's state.
//!
//! # Strategies
//!
//! - **Monitor** ([`MonitorCoordinator`]): one lock over the whole table state
//!   plus one wait slot per seat. Forks are not modelled; "holding both forks"
//!   is the single permission bit `state[i] == Eating`.
//! - **Hierarchy** ([`HierarchyCoordinator`]): one lock per fork, picked up in
//!   increasing index order and put down in decreasing order, which makes a
//!   circular wait impossible.
//!
//! # Seating
//!
//! Seats are numbered `0..n` around a ring. Seat `i` has neighbors
//! `(i + n - 1) % n` and `(i + 1) % n`; fork `i` lies between seat `i - 1` and
//! seat `i`, so seat `i` uses forks `i` and `(i + 1) % n`.
//!
//! # Example
//!
//! ```
//! use philosophers::coordinator::{Coordinator, MonitorCoordinator};
//!
//! let table = MonitorCoordinator::new(5).unwrap();
//! table.request(0);
//! table.request(2); // not adjacent to 0, granted immediately
//! table.release(0);
//! table.release(2);
//! ```

pub mod error;
pub mod events;
pub mod hierarchy;
pub mod monitor;

pub use error::CoordinatorError;
pub use events::{EventSink, TableEvent};
pub use hierarchy::{ForkPair, HierarchyCoordinator};
pub use monitor::MonitorCoordinator;

use crate::config::TableConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Smallest ring that still has one fork per edge
pub const MIN_PHILOSOPHERS: usize = 2;

/// Which algorithm arbitrates the forks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Monitor,
    Hierarchy,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Monitor
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Monitor => write!(f, "monitor"),
            Strategy::Hierarchy => write!(f, "hierarchy"),
        }
    }
}

/// Logical state of a seat, as seen by the monitor
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhilosopherState {
    Thinking,
    Hungry,
    /// Hungry, and passed over often enough that neighbors must yield
    Starving,
    Eating,
}

impl PhilosopherState {
    /// Waiting for permission (Hungry or Starving)
    #[inline]
    pub fn is_hungry(self) -> bool {
        matches!(self, PhilosopherState::Hungry | PhilosopherState::Starving)
    }
}

impl fmt::Display for PhilosopherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhilosopherState::Thinking => write!(f, "thinking"),
            PhilosopherState::Hungry => write!(f, "hungry"),
            PhilosopherState::Starving => write!(f, "starving"),
            PhilosopherState::Eating => write!(f, "eating"),
        }
    }
}

/// Contract shared by both strategies
///
/// Implementations are shared between philosopher threads behind an `Arc`, so
/// every method takes `&self` and does its own locking.
///
/// # Contract
///
/// - `request(id)` blocks until seat `id` may eat. It must only be called by
///   seat `id`'s own thread while that seat is not already eating.
/// - `release(id)` hands the forks back and never waits on another
///   philosopher. Calling it without a matching `request` is a logic error
///   and panics.
pub trait Coordinator: Send + Sync {
    /// Algorithm in use
    fn strategy(&self) -> Strategy;

    /// Number of seats at the table
    fn philosophers(&self) -> usize;

    /// Block until seat `id` holds both forks
    fn request(&self, id: usize);

    /// Put both forks back
    fn release(&self, id: usize);
}

/// Seat to the left of `id` on a ring of `n`
#[inline]
pub fn left_of(id: usize, n: usize) -> usize {
    (id + n - 1) % n
}

/// Seat to the right of `id` on a ring of `n`
#[inline]
pub fn right_of(id: usize, n: usize) -> usize {
    (id + 1) % n
}

pub(crate) fn check_table_size(philosophers: usize) -> Result<(), CoordinatorError> {
    if philosophers < MIN_PHILOSOPHERS {
        return Err(CoordinatorError::TooFewPhilosophers {
            count: philosophers,
            min: MIN_PHILOSOPHERS,
        });
    }
    Ok(())
}

/// Build the coordinator described by `table`
///
/// `events`, when given, receives every decision the coordinator makes.
pub fn build_coordinator(
    table: &TableConfig,
    events: Option<EventSink>,
) -> Result<Arc<dyn Coordinator>, CoordinatorError> {
    match table.strategy {
        Strategy::Monitor => {
            let mut monitor = MonitorCoordinator::new(table.philosophers)?;
            if let Some(threshold) = table.starvation_threshold {
                monitor = monitor.with_starvation_threshold(threshold)?;
            }
            if let Some(sink) = events {
                monitor = monitor.with_events(sink);
            }
            Ok(Arc::new(monitor))
        }
        Strategy::Hierarchy => {
            let mut hierarchy = HierarchyCoordinator::new(table.philosophers)?;
            if let Some(sink) = events {
                hierarchy = hierarchy.with_events(sink);
            }
            Ok(Arc::new(hierarchy))
        }
    }
}
