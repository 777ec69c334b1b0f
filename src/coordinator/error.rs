//! Coordinator construction errors
//!
//! Both coordinators reject malformed tables when they are built rather than
//! when the first philosopher sits down. Releasing forks that were never
//! picked up is not represented here: that is a logic error and panics.

use thiserror::Error;

/// Reasons a coordinator refuses to be constructed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinatorError {
    /// The ring needs at least two seats for the fork-per-edge layout
    #[error("a table needs at least {min} philosophers, got {count}")]
    TooFewPhilosophers { count: usize, min: usize },

    /// A fork index does not exist on this table
    #[error("philosopher {actor}: fork {fork} is out of range for a table of {forks} forks")]
    ForkOutOfRange { actor: usize, fork: usize, forks: usize },

    /// The pair would be picked up high-then-low, breaking the global order
    #[error("philosopher {actor}: fork pair ({low}, {high}) is not in strictly increasing order")]
    UnorderedPair { actor: usize, low: usize, high: usize },

    /// The pair is ordered but does not name the two forks beside the seat
    #[error("philosopher {actor}: forks ({low}, {high}) are not the forks beside seat {actor}")]
    NotAdjacent { actor: usize, low: usize, high: usize },

    /// A zero threshold would promote every hungry philosopher immediately
    #[error("starvation threshold must be at least 1")]
    ZeroStarvationThreshold,
}
