//! Monitor coordinator
//!
//! All table state lives behind one [`Mutex`]. Each seat has its own
//! [`Condvar`] wait slot, every slot paired with that same mutex. Forks are not
//! modelled at all: a seat "holds both forks" exactly when its state is
//! `Eating`.
//!
//! # Check, take, release
//!
//! Every read and write of a seat's neighborhood happens while the table lock
//! is held, so the eligibility check, the transition to `Eating` and the wake-up
//! of the waiting thread are one atomic step. A philosopher can never start
//! eating on a stale view of its neighbors.
//!
//! - `request_permission(i)`: `Thinking -> Hungry`, then try to grant. If the
//!   grant fails, wait on slot `i` until the state reads `Eating`.
//! - `release_permission(i)`: `Eating -> Thinking`, then try to grant both
//!   neighbors. A successful grant notifies only the granted seat's slot.
//!
//! Waiters always re-read their state after waking, so a spurious wake-up
//! simply puts them back to sleep.
//!
//! # Starvation
//!
//! The base algorithm does not bound waiting: a seat whose two neighbors keep
//! taking turns can stay hungry forever. An optional starvation guard counts
//! how many times a hungry seat was passed over when a neighbor released. Once
//! the count reaches the threshold the seat becomes `Starving`, and hungry
//! neighbors are refused until it has eaten. This lowers parallelism (a seat
//! can end up waiting for its neighbor's neighbor) in exchange for progress.

use super::{
    check_table_size, left_of, right_of, Coordinator, CoordinatorError, EventSink,
    PhilosopherState, Strategy, TableEvent,
};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use tracing::{info, trace};

/// Everything the table lock protects
#[derive(Debug)]
struct TableState {
    states: Vec<PhilosopherState>,
    /// Times each hungry seat was re-evaluated and refused after a neighbor
    /// released. Only maintained when the starvation guard is on.
    passed_over: Vec<u32>,
}

/// Monitor-based coordinator with one lock and per-seat wait slots
#[derive(Debug)]
pub struct MonitorCoordinator {
    table: Mutex<TableState>,
    slots: Vec<Condvar>,
    starvation_threshold: Option<u32>,
    events: Option<EventSink>,
}

impl MonitorCoordinator {
    /// Create a monitor for `philosophers` seats, everyone thinking
    ///
    /// # Errors
    ///
    /// Fails with [`CoordinatorError::TooFewPhilosophers`] below two seats.
    pub fn new(philosophers: usize) -> Result<Self, CoordinatorError> {
        check_table_size(philosophers)?;

        Ok(Self {
            table: Mutex::new(TableState {
                states: vec![PhilosopherState::Thinking; philosophers],
                passed_over: vec![0; philosophers],
            }),
            slots: (0..philosophers).map(|_| Condvar::new()).collect(),
            starvation_threshold: None,
            events: None,
        })
    }

    /// Turn on the starvation guard
    ///
    /// A hungry seat refused `threshold` times in a row becomes `Starving`.
    pub fn with_starvation_threshold(mut self, threshold: u32) -> Result<Self, CoordinatorError> {
        if threshold == 0 {
            return Err(CoordinatorError::ZeroStarvationThreshold);
        }
        self.starvation_threshold = Some(threshold);
        Ok(self)
    }

    /// Publish every transition to `sink`
    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Copy of the whole state array, taken under the table lock
    pub fn snapshot(&self) -> Vec<PhilosopherState> {
        self.lock_table().states.clone()
    }

    /// Current state of one seat
    pub fn state(&self, id: usize) -> PhilosopherState {
        self.lock_table().states[id]
    }

    /// Mark `id` hungry and block until it may eat
    ///
    /// Returns only once `state[id] == Eating`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or the seat is not currently thinking.
    pub fn request_permission(&self, id: usize) {
        self.check_seat(id);

        let mut table = self.lock_table();
        let current = table.states[id];
        assert!(
            current == PhilosopherState::Thinking,
            "philosopher {} requested forks while {}",
            id,
            current
        );

        table.states[id] = PhilosopherState::Hungry;
        self.emit(TableEvent::Hungry { id });
        trace!(id, "hungry");

        self.try_grant(&mut table, id);

        // Only a grant made under the lock sets Eating; anything else that
        // wakes this thread is spurious.
        while table.states[id] != PhilosopherState::Eating {
            table = self.slots[id]
                .wait(table)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Hand permission back and re-evaluate both neighbors
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range or the seat is not eating. Releasing
    /// forks that were never granted would corrupt the table.
    pub fn release_permission(&self, id: usize) {
        self.check_seat(id);

        let mut table = self.lock_table();
        let current = table.states[id];
        assert!(
            current == PhilosopherState::Eating,
            "philosopher {} released forks while {}",
            id,
            current
        );

        table.states[id] = PhilosopherState::Thinking;
        self.emit(TableEvent::Released { id });
        trace!(id, "released");

        let n = self.slots.len();
        let left = left_of(id, n);
        let right = right_of(id, n);

        self.try_grant(&mut table, left);
        self.note_passed_over(&mut table, left);
        if right != left {
            self.try_grant(&mut table, right);
            self.note_passed_over(&mut table, right);
        }
    }

    /// Eligibility test, called only with the table lock held
    ///
    /// Grants `id` iff it is hungry and neither neighbor is eating. With the
    /// starvation guard on, a plain hungry seat also yields to a starving
    /// neighbor. Returns whether the grant happened.
    fn try_grant(&self, table: &mut TableState, id: usize) -> bool {
        let n = table.states.len();
        let me = table.states[id];
        let left = table.states[left_of(id, n)];
        let right = table.states[right_of(id, n)];

        if !me.is_hungry() {
            return false;
        }
        if left == PhilosopherState::Eating || right == PhilosopherState::Eating {
            return false;
        }
        if me == PhilosopherState::Hungry
            && (left == PhilosopherState::Starving || right == PhilosopherState::Starving)
        {
            return false;
        }

        table.states[id] = PhilosopherState::Eating;
        table.passed_over[id] = 0;
        self.emit(TableEvent::Granted { id });
        trace!(id, "granted");

        self.slots[id].notify_one();
        true
    }

    /// Count a refusal of a hungry neighbor and promote it if needed
    fn note_passed_over(&self, table: &mut TableState, id: usize) {
        let Some(threshold) = self.starvation_threshold else {
            return;
        };
        if table.states[id] != PhilosopherState::Hungry {
            return;
        }

        table.passed_over[id] += 1;
        if table.passed_over[id] >= threshold {
            table.states[id] = PhilosopherState::Starving;
            self.emit(TableEvent::Starving { id });
            info!(id, passed_over = table.passed_over[id], "philosopher is starving");

            // It may have been refused only because of a starving neighbor,
            // which no longer applies now that it is starving too.
            self.try_grant(table, id);
        }
    }

    fn check_seat(&self, id: usize) {
        assert!(
            id < self.slots.len(),
            "philosopher {} does not exist at a table of {}",
            id,
            self.slots.len()
        );
    }

    fn lock_table(&self) -> MutexGuard<'_, TableState> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[inline]
    fn emit(&self, event: TableEvent) {
        if let Some(ref sink) = self.events {
            sink.emit(event);
        }
    }
}

impl Coordinator for MonitorCoordinator {
    fn strategy(&self) -> Strategy {
        Strategy::Monitor
    }

    fn philosophers(&self) -> usize {
        self.slots.len()
    }

    fn request(&self, id: usize) {
        self.request_permission(id);
    }

    fn release(&self, id: usize) {
        self.release_permission(id);
    }
}
