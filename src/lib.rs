//! Philosophers - the dining philosophers problem, solved two ways
//!
//! N philosophers sit around a ring with one fork between each pair of
//! neighbors. Each needs both adjacent forks to eat. A coordinator decides who
//! may eat so that neighbors never eat together, nobody deadlocks, and (with
//! the monitor's starvation guard) nobody is passed over forever.
//!
//! # Architecture
//!
//! - **Coordinators**: a monitor over the whole table, or per-fork locks taken
//!   in a global order ([`coordinator`])
//! - **Philosophers**: one thread per seat cycling think, request, eat,
//!   release ([`philosopher`])
//! - **Delays**: uniform, fixed, or gaussian think/eat times ([`distribution`])
//! - **Table**: runs a dinner and aggregates wait latency and fairness
//!   ([`table`], [`stats`])

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod logging;
pub mod output;
pub mod philosopher;
pub mod stats;
pub mod table;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::{Coordinator, HierarchyCoordinator, MonitorCoordinator};
pub use table::Table;

/// Result type used throughout the crate
pub type Result<T> = anyhow::Result<T>;
