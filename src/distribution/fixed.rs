//! Fixed delay
//!
//! Always returns the same duration. Handy for deterministic demos and for
//! tests that only care about interleavings, not timing.

use super::DelaySource;
use std::time::Duration;

/// Constant delay
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_micros(us: u64) -> Self {
        Self::new(Duration::from_micros(us))
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl DelaySource for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }
}
