//! Configuration validation

use super::*;
use crate::coordinator::MIN_PHILOSOPHERS;
use anyhow::{Context, Result};

/// Upper bound on seats; each one is an OS thread
pub const MAX_PHILOSOPHERS: usize = 4096;

/// Longest accepted timed run (one year); use `forever` for anything longer
pub const MAX_DURATION_MS: u64 = 365 * 24 * 60 * 60 * 1000;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_table(&config.table)?;
    validate_delay(&config.timing.think).context("Invalid think time")?;
    validate_delay(&config.timing.eat).context("Invalid eat time")?;
    validate_completion(&config.completion)?;

    Ok(())
}

/// Validate table configuration
pub fn validate_table(table: &TableConfig) -> Result<()> {
    if table.philosophers < MIN_PHILOSOPHERS {
        anyhow::bail!(
            "At least {} philosophers are required, got {}",
            MIN_PHILOSOPHERS,
            table.philosophers
        );
    }

    if table.philosophers > MAX_PHILOSOPHERS {
        anyhow::bail!(
            "At most {} philosophers are supported, got {}",
            MAX_PHILOSOPHERS,
            table.philosophers
        );
    }

    if let Some(threshold) = table.starvation_threshold {
        if threshold == 0 {
            anyhow::bail!("starvation_threshold must be at least 1");
        }
        if table.strategy != Strategy::Monitor {
            anyhow::bail!(
                "starvation_threshold only applies to the monitor strategy, not {}",
                table.strategy
            );
        }
    }

    Ok(())
}

fn validate_delay(delay: &DelayConfig) -> Result<()> {
    if let DelayConfig::Uniform { min_us, max_us } = *delay {
        if min_us > max_us {
            anyhow::bail!("min ({}us) must not exceed max ({}us)", min_us, max_us);
        }
    }

    Ok(())
}

fn validate_completion(completion: &CompletionMode) -> Result<()> {
    match *completion {
        CompletionMode::Meals { count: 0 } => {
            anyhow::bail!("meals must be at least 1");
        }
        CompletionMode::Duration { millis: 0 } => {
            anyhow::bail!("duration must be greater than zero");
        }
        CompletionMode::Duration { millis } if millis > MAX_DURATION_MS => {
            anyhow::bail!(
                "duration must not exceed {}ms, got {}ms (use forever instead)",
                MAX_DURATION_MS,
                millis
            );
        }
        _ => Ok(()),
    }
}
