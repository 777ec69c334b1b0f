//! Delay distributions for think and eat times
//!
//! A philosopher never decides how long it thinks or eats; it asks a
//! [`DelaySource`] and sleeps (or spins) for whatever comes back. The
//! coordinators never see these values, so any source works with either
//! strategy.
//!
//! # Sources
//!
//! - **Uniform**: equal probability over `[min, max]` (the classic 200-800 ms)
//! - **Fixed**: the same delay every time, for deterministic runs
//! - **Gaussian**: normal around a mean, clamped at zero
//!
//! # Example
//!
//! ```
//! use philosophers::distribution::{DelaySource, uniform::UniformDelay};
//! use std::time::Duration;
//!
//! let mut think = UniformDelay::with_seed(200_000, 800_000, 7);
//! let delay = think.next_delay();
//! assert!(delay >= Duration::from_millis(200) && delay <= Duration::from_millis(800));
//! ```

pub mod fixed;
pub mod gaussian;
pub mod uniform;

use crate::config::timing::DelayConfig;
use crate::Result;
use std::time::Duration;

/// Source of think/eat durations
///
/// Each philosopher owns its own sources, so implementations only need to be
/// `Send`; no source is ever shared between threads.
pub trait DelaySource: Send {
    /// Next non-negative delay
    fn next_delay(&mut self) -> Duration;
}

/// Build the source described by `config`
///
/// With `seed` the sequence is reproducible; without it each source is seeded
/// from entropy.
pub fn build_delay_source(config: &DelayConfig, seed: Option<u64>) -> Result<Box<dyn DelaySource>> {
    let source: Box<dyn DelaySource> = match *config {
        DelayConfig::Uniform { min_us, max_us } => match seed {
            Some(seed) => Box::new(uniform::UniformDelay::with_seed(min_us, max_us, seed)),
            None => Box::new(uniform::UniformDelay::new(min_us, max_us)),
        },
        DelayConfig::Fixed { us } => Box::new(fixed::FixedDelay::from_micros(us)),
        DelayConfig::Gaussian { mean_us, stddev_us } => match seed {
            Some(seed) => Box::new(gaussian::GaussianDelay::with_seed(mean_us, stddev_us, seed)?),
            None => Box::new(gaussian::GaussianDelay::new(mean_us, stddev_us)?),
        },
    };
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_each_kind() {
        let configs = [
            DelayConfig::Uniform { min_us: 10, max_us: 20 },
            DelayConfig::Fixed { us: 15 },
            DelayConfig::Gaussian { mean_us: 15, stddev_us: 2 },
        ];
        for config in &configs {
            let mut source = build_delay_source(config, Some(1)).unwrap();
            let _ = source.next_delay();
            let mut source = build_delay_source(config, None).unwrap();
            let _ = source.next_delay();
        }
    }

    #[test]
    fn test_build_fixed_ignores_seed() {
        let config = DelayConfig::Fixed { us: 250 };
        let mut source = build_delay_source(&config, Some(99)).unwrap();
        assert_eq!(source.next_delay(), Duration::from_micros(250));
    }
}
