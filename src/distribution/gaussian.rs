//! Gaussian (normal) delay distribution
//!
//! Delays cluster around a mean with a configurable spread. Samples below zero
//! are clamped to zero, so a wide spread around a small mean skews short.
//!
//! # Example
//!
//! ```
//! use philosophers::distribution::{DelaySource, gaussian::GaussianDelay};
//!
//! // Around 500ms, most samples within +/- 100ms
//! let mut think = GaussianDelay::new(500_000, 100_000).unwrap();
//! let _delay = think.next_delay();
//! ```

use super::DelaySource;
use crate::Result;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::time::Duration;

/// Normally distributed delay, in microseconds
pub struct GaussianDelay {
    normal: Normal<f64>,
    rng: Xoshiro256PlusPlus,
}

impl GaussianDelay {
    /// Create a new gaussian delay with random seed
    pub fn new(mean_us: u64, stddev_us: u64) -> Result<Self> {
        Self::with_rng(mean_us, stddev_us, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a new gaussian delay with specific seed
    pub fn with_seed(mean_us: u64, stddev_us: u64, seed: u64) -> Result<Self> {
        Self::with_rng(mean_us, stddev_us, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn with_rng(mean_us: u64, stddev_us: u64, rng: Xoshiro256PlusPlus) -> Result<Self> {
        let normal = Normal::new(mean_us as f64, stddev_us as f64)
            .map_err(|e| anyhow::anyhow!("Invalid gaussian delay parameters: {}", e))?;
        Ok(Self { normal, rng })
    }
}

impl DelaySource for GaussianDelay {
    fn next_delay(&mut self) -> Duration {
        let us = self.normal.sample(&mut self.rng);
        Duration::from_micros(us.max(0.0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_delay_seeded() {
        let mut a = GaussianDelay::with_seed(10_000, 2_000, 12345).unwrap();
        let mut b = GaussianDelay::with_seed(10_000, 2_000, 12345).unwrap();

        for _ in 0..10 {
            assert_eq!(a.next_delay(), b.next_delay());
        }
    }

    #[test]
    fn test_gaussian_delay_clusters_around_mean() {
        let mut delay = GaussianDelay::with_seed(10_000, 1_000, 42).unwrap();
        let samples: Vec<u128> = (0..2000).map(|_| delay.next_delay().as_micros()).collect();

        let mean = samples.iter().sum::<u128>() as f64 / samples.len() as f64;
        assert!((mean - 10_000.0).abs() < 200.0, "mean {} too far from 10000", mean);

        // Roughly 95% within two standard deviations
        let within = samples.iter().filter(|&&us| (8_000..=12_000).contains(&us)).count();
        assert!(within > 1800, "only {} of 2000 samples within 2 sigma", within);
    }

    #[test]
    fn test_gaussian_delay_never_negative() {
        // Mean near zero with a large spread: half the raw samples are negative
        let mut delay = GaussianDelay::with_seed(10, 10_000, 7).unwrap();
        let zeros = (0..1000).filter(|_| delay.next_delay() == Duration::ZERO).count();
        assert!(zeros > 300);
    }

    #[test]
    fn test_gaussian_delay_zero_stddev() {
        let mut delay = GaussianDelay::with_seed(750, 0, 1).unwrap();
        assert_eq!(delay.next_delay(), Duration::from_micros(750));
    }
}
