//! Wait-latency histogram using HdrHistogram
//!
//! Records how long philosophers block between asking for their forks and
//! being allowed to eat.
//!
//! # Example
//!
//! ```
//! use philosophers::stats::histogram::LatencyHistogram;
//! use std::time::Duration;
//!
//! let mut hist = LatencyHistogram::new();
//! hist.record(Duration::from_micros(100));
//! hist.record(Duration::from_millis(3));
//!
//! assert_eq!(hist.len(), 2);
//! assert!(hist.percentile(99.0).unwrap() >= Duration::from_millis(2));
//! ```

use crate::Result;
use hdrhistogram::Histogram;
use std::time::Duration;

/// Highest trackable value: one hour in nanoseconds
const MAX_NANOS: u64 = 3_600_000_000_000;

/// Latency histogram wrapper
///
/// Tracks 1ns to 1 hour with 3 significant digits (values within 0.1%).
/// Samples outside the range are clamped.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_NANOS, 3)
            .expect("Failed to create histogram with valid bounds");

        Self { histogram }
    }

    /// Record one sample
    #[inline]
    pub fn record(&mut self, latency: Duration) {
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(MAX_NANOS);
        let _ = self.histogram.record(nanos.clamp(1, MAX_NANOS));
    }

    /// Value at `percentile` (0.0 - 100.0), or None when empty
    pub fn percentile(&self, percentile: f64) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(
            self.histogram.value_at_percentile(percentile),
        ))
    }

    pub fn min(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.min()))
    }

    pub fn max(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.max()))
    }

    pub fn mean(&self) -> Option<Duration> {
        if self.is_empty() {
            return None;
        }
        Some(Duration::from_nanos(self.histogram.mean() as u64))
    }

    /// Number of samples recorded
    pub fn len(&self) -> u64 {
        self.histogram.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histogram.len() == 0
    }

    /// Merge another histogram into this one
    ///
    /// Used to build the table-wide wait distribution from every seat.
    pub fn merge(&mut self, other: &LatencyHistogram) -> Result<()> {
        self.histogram
            .add(&other.histogram)
            .map_err(|e| anyhow::anyhow!("Failed to merge histograms: {}", e))?;
        Ok(())
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_histogram() {
        let hist = LatencyHistogram::new();
        assert_eq!(hist.len(), 0);
        assert!(hist.is_empty());
        assert!(hist.percentile(50.0).is_none());
        assert!(hist.min().is_none());
        assert!(hist.mean().is_none());
    }

    #[test]
    fn test_percentile() {
        let mut hist = LatencyHistogram::new();
        for i in 1..=100 {
            hist.record(Duration::from_micros(i * 10));
        }

        let p50 = hist.percentile(50.0).unwrap();
        let p99 = hist.percentile(99.0).unwrap();

        assert!(p50.as_micros() >= 450 && p50.as_micros() <= 550);
        assert!(p99.as_micros() >= 940 && p99.as_micros() <= 1040);
    }

    #[test]
    fn test_min_max_mean() {
        let mut hist = LatencyHistogram::new();
        hist.record(Duration::from_micros(100));
        hist.record(Duration::from_micros(300));
        hist.record(Duration::from_micros(200));

        let min = hist.min().unwrap();
        let max = hist.max().unwrap();
        let mean = hist.mean().unwrap();

        assert!(min.as_micros() >= 95 && min.as_micros() <= 105);
        assert!(max.as_micros() >= 295 && max.as_micros() <= 305);
        assert!(mean.as_micros() >= 190 && mean.as_micros() <= 210);
    }

    #[test]
    fn test_zero_wait_is_recorded() {
        // An immediate grant still counts as a sample
        let mut hist = LatencyHistogram::new();
        hist.record(Duration::ZERO);
        assert_eq!(hist.len(), 1);
        assert!(hist.min().unwrap() <= Duration::from_micros(1));
    }

    #[test]
    fn test_clamps_huge_values() {
        let mut hist = LatencyHistogram::new();
        hist.record(Duration::from_secs(10 * 3600));
        assert_eq!(hist.len(), 1);
        assert!(hist.max().unwrap() < Duration::from_secs(3700));
    }

    #[test]
    fn test_merge() {
        let mut hist1 = LatencyHistogram::new();
        hist1.record(Duration::from_micros(100));
        hist1.record(Duration::from_micros(200));

        let mut hist2 = LatencyHistogram::new();
        hist2.record(Duration::from_micros(300));
        hist2.record(Duration::from_micros(400));

        hist1.merge(&hist2).unwrap();

        assert_eq!(hist1.len(), 4);
        let mean = hist1.mean().unwrap();
        assert!(mean.as_micros() >= 240 && mean.as_micros() <= 260);
    }
}
