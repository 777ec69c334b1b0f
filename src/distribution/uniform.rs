//! Uniform delay distribution
//!
//! Every duration in `[min, max]` (microsecond resolution) is equally likely.
//! This is the default for both thinking and eating.
//!
//! # Example
//!
//! ```
//! use philosophers::distribution::{DelaySource, uniform::UniformDelay};
//! use std::time::Duration;
//!
//! let mut eat = UniformDelay::new(1_000, 5_000);
//! for _ in 0..10 {
//!     let delay = eat.next_delay();
//!     assert!(delay >= Duration::from_micros(1_000));
//!     assert!(delay <= Duration::from_micros(5_000));
//! }
//! ```

use super::DelaySource;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::Duration;

/// Uniform delay over an inclusive microsecond range
///
/// Uses xoshiro256++ for fast, good-quality random numbers. A reversed range is
/// normalized rather than rejected; validation catches it earlier for configs.
pub struct UniformDelay {
    min_us: u64,
    max_us: u64,
    rng: Xoshiro256PlusPlus,
}

impl UniformDelay {
    /// Create a new uniform delay with random seed
    pub fn new(min_us: u64, max_us: u64) -> Self {
        Self::with_rng(min_us, max_us, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a new uniform delay with specific seed
    ///
    /// Useful for reproducible runs.
    pub fn with_seed(min_us: u64, max_us: u64, seed: u64) -> Self {
        Self::with_rng(min_us, max_us, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn with_rng(min_us: u64, max_us: u64, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            min_us: min_us.min(max_us),
            max_us: min_us.max(max_us),
            rng,
        }
    }
}

impl DelaySource for UniformDelay {
    #[inline]
    fn next_delay(&mut self) -> Duration {
        Duration::from_micros(self.rng.gen_range(self.min_us..=self.max_us))
    }
}
