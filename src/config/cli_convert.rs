//! CLI to Config conversion utilities

use crate::config::cli;
use crate::config::timing::{DelayConfig, DelayMode};
use crate::coordinator::Strategy;
use anyhow::{Context, Result};

/// Parse a duration string (e.g., "500ms", "10s", "2m", "1h") to milliseconds
///
/// A bare number is taken as seconds.
pub fn parse_duration_ms(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    // "ms" must be tested before "m" and "s"
    let (num_str, multiplier) = if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1u64)
    } else if s.ends_with("min") || s.ends_with('m') {
        (s.trim_end_matches("min").trim_end_matches('m'), 60_000)
    } else if s.ends_with("sec") || s.ends_with('s') {
        (s.trim_end_matches("sec").trim_end_matches('s'), 1_000)
    } else if s.ends_with("hr") || s.ends_with('h') {
        (s.trim_end_matches("hr").trim_end_matches('h'), 3_600_000)
    } else {
        (s.as_str(), 1_000)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration out of range: {}", s))
}

/// Parse a time string (e.g., "100us", "1ms", "2s") to microseconds
///
/// A bare number is taken as microseconds.
pub fn parse_time_us(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("us") {
        (s.trim_end_matches("us"), 1u64)
    } else if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1000)
    } else if s.ends_with('s') {
        (s.trim_end_matches('s'), 1_000_000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid time format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Time out of range: {}", s))
}

/// Convert CLI StrategyType to coordinator Strategy
pub fn convert_strategy(cli_strategy: cli::StrategyType) -> Strategy {
    match cli_strategy {
        cli::StrategyType::Monitor => Strategy::Monitor,
        cli::StrategyType::Hierarchy => Strategy::Hierarchy,
    }
}

/// Convert CLI DelayModeType to timing DelayMode
pub fn convert_delay_mode(cli_mode: cli::DelayModeType) -> DelayMode {
    match cli_mode {
        cli::DelayModeType::Sleep => DelayMode::Sleep,
        cli::DelayModeType::Spin => DelayMode::Spin,
    }
}

/// Build a delay from a distribution and a [min, max] range in microseconds
///
/// Fixed uses `min`. Gaussian centers on the midpoint with a quarter of the
/// range as standard deviation, so about 95% of samples land inside it.
pub fn delay_from_range(dist: cli::DistributionType, min_us: u64, max_us: u64) -> DelayConfig {
    let (lo, hi) = (min_us.min(max_us), min_us.max(max_us));
    match dist {
        cli::DistributionType::Uniform => DelayConfig::Uniform { min_us, max_us },
        cli::DistributionType::Fixed => DelayConfig::Fixed { us: min_us },
        cli::DistributionType::Gaussian => DelayConfig::Gaussian {
            mean_us: lo + (hi - lo) / 2,
            stddev_us: (hi - lo) / 4,
        },
    }
}

/// Lower and upper bound of an existing delay, in microseconds
pub fn delay_bounds(delay: &DelayConfig) -> (u64, u64) {
    match *delay {
        DelayConfig::Uniform { min_us, max_us } => (min_us, max_us),
        DelayConfig::Fixed { us } => (us, us),
        DelayConfig::Gaussian { mean_us, stddev_us } => (
            mean_us.saturating_sub(stddev_us.saturating_mul(2)),
            mean_us.saturating_add(stddev_us.saturating_mul(2)),
        ),
    }
}
