//! Exclusion verification
//!
//! An independent check, run from the philosophers' side, that no two
//! neighbors are ever inside their meals at the same time. It does not trust
//! the coordinator: each philosopher raises its own flag after being granted
//! and lowers it before releasing, and on the way in looks at both neighbors.

use crate::coordinator::{left_of, right_of};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::error;

/// Per-seat eating flags plus a violation counter
#[derive(Debug)]
pub struct ExclusionVerifier {
    eating: Vec<AtomicBool>,
    violations: AtomicU64,
}

impl ExclusionVerifier {
    pub fn new(philosophers: usize) -> Self {
        Self {
            eating: (0..philosophers).map(|_| AtomicBool::new(false)).collect(),
            violations: AtomicU64::new(0),
        }
    }

    /// Seat `id` starts eating
    ///
    /// Counts one violation per neighbor already eating, and one if `id`
    /// itself was already marked.
    pub fn enter(&self, id: usize) {
        let n = self.eating.len();
        if self.eating[id].swap(true, Ordering::SeqCst) {
            self.violation(id, id);
        }
        for neighbor in [left_of(id, n), right_of(id, n)] {
            if neighbor != id && self.eating[neighbor].load(Ordering::SeqCst) {
                self.violation(id, neighbor);
            }
        }
    }

    /// Seat `id` is done eating
    pub fn leave(&self, id: usize) {
        self.eating[id].store(false, Ordering::SeqCst);
    }

    /// Violations observed so far
    pub fn violations(&self) -> u64 {
        self.violations.load(Ordering::SeqCst)
    }

    fn violation(&self, id: usize, other: usize) {
        self.violations.fetch_add(1, Ordering::SeqCst);
        error!(
            philosopher = id,
            neighbor = other,
            "exclusion violated: neighbors eating together"
        );
    }
}
