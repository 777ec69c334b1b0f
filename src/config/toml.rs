//! TOML configuration file parsing

use super::*;
use crate::config::cli::{Cli, DistributionType as CliDistType};
use crate::config::cli_convert::{
    convert_delay_mode, convert_strategy, delay_bounds, delay_from_range, parse_duration_ms,
    parse_time_us,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Table
    if let Some(philosophers) = cli.philosophers {
        config.table.philosophers = philosophers;
    }
    if let Some(strategy) = cli.strategy {
        config.table.strategy = convert_strategy(strategy);
    }
    if let Some(threshold) = cli.starvation_threshold {
        config.table.starvation_threshold = Some(threshold);
    }

    // Completion
    if let Some(count) = cli.meals {
        config.completion = CompletionMode::Meals { count };
    } else if let Some(ref duration) = cli.duration {
        config.completion = CompletionMode::Duration {
            millis: parse_duration_ms(duration)?,
        };
    } else if cli.forever {
        config.completion = CompletionMode::Forever;
    }

    // Timing
    config.timing.think = override_delay(
        &config.timing.think,
        cli.distribution,
        cli.think_min.as_deref(),
        cli.think_max.as_deref(),
    )
    .context("Invalid think time")?;
    config.timing.eat = override_delay(
        &config.timing.eat,
        cli.distribution,
        cli.eat_min.as_deref(),
        cli.eat_max.as_deref(),
    )
    .context("Invalid eat time")?;
    if let Some(mode) = cli.delay_mode {
        config.timing.mode = convert_delay_mode(mode);
    }
    if let Some(seed) = cli.seed {
        config.timing.seed = Some(seed);
    }

    // Output
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.per_philosopher {
        config.output.per_philosopher = true;
    }
    if cli.verbose > 0 {
        config.output.verbosity = cli.verbose;
    }

    // Runtime
    if cli.verify {
        config.runtime.verify = true;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }

    Ok(config)
}

/// Rebuild `current` with whichever of distribution, min and max the CLI gave
fn override_delay(
    current: &DelayConfig,
    dist: Option<CliDistType>,
    min: Option<&str>,
    max: Option<&str>,
) -> Result<DelayConfig> {
    if dist.is_none() && min.is_none() && max.is_none() {
        return Ok(current.clone());
    }

    let (mut min_us, mut max_us) = delay_bounds(current);
    if let Some(s) = min {
        min_us = parse_time_us(s)?;
    }
    if let Some(s) = max {
        max_us = parse_time_us(s)?;
    }

    let dist = dist.unwrap_or(match current {
        DelayConfig::Uniform { .. } => CliDistType::Uniform,
        DelayConfig::Fixed { .. } => CliDistType::Fixed,
        DelayConfig::Gaussian { .. } => CliDistType::Gaussian,
    });

    // Fixed only reads min
    if dist != CliDistType::Fixed && min_us > max_us {
        anyhow::bail!("min ({}us) must not exceed max ({}us)", min_us, max_us);
    }

    Ok(delay_from_range(dist, min_us, max_us))
}
