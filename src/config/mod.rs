//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod timing;
pub mod toml;
pub mod validator;

use crate::coordinator::Strategy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use timing::*;

/// Complete dinner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub completion: CompletionMode,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Table layout and arbitration strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Number of philosophers (and forks)
    #[serde(default = "default_philosophers")]
    pub philosophers: usize,
    /// Coordinator algorithm
    #[serde(default)]
    pub strategy: Strategy,
    /// Refusals before a hungry philosopher is promoted to starving
    /// (monitor only, off when unset)
    #[serde(default)]
    pub starvation_threshold: Option<u32>,
}

fn default_philosophers() -> usize {
    5
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            philosophers: default_philosophers(),
            strategy: Strategy::default(),
            starvation_threshold: None,
        }
    }
}

/// Think/eat delay configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Thinking time distribution
    #[serde(default)]
    pub think: DelayConfig,
    /// Eating time distribution
    #[serde(default)]
    pub eat: DelayConfig,
    /// Sleep or busy-wait through delays
    #[serde(default)]
    pub mode: DelayMode,
    /// Base seed for reproducible delays (entropy when unset)
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report path
    pub json_output: Option<PathBuf>,
    /// Include one row per philosopher in the text report
    #[serde(default)]
    pub per_philosopher: bool,
    /// Log verbosity (0 = warn, 1 = info, 2 = debug, 3+ = trace)
    #[serde(default)]
    pub verbosity: u8,
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Check neighbor exclusion from the philosophers' side while eating
    #[serde(default)]
    pub verify: bool,
    /// Validate and print the configuration, then exit
    #[serde(default)]
    pub dry_run: bool,
}

// Display trait implementations

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Table: {}", self.table)?;
        writeln!(f, "  Timing: {}", self.timing)?;
        writeln!(f, "  Completion: {}", self.completion)?;
        writeln!(f, "  Output: {}", self.output)?;
        writeln!(f, "  Runtime: {}", self.runtime)?;
        Ok(())
    }
}

impl fmt::Display for TableConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} philosophers, strategy={}", self.philosophers, self.strategy)?;
        if let Some(threshold) = self.starvation_threshold {
            write!(f, ", starvation_threshold={}", threshold)?;
        }
        Ok(())
    }
}

impl fmt::Display for TimingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "think={}, eat={}, mode={}", self.think, self.eat, self.mode)?;
        if let Some(seed) = self.seed {
            write!(f, ", seed={}", seed)?;
        }
        Ok(())
    }
}

impl fmt::Display for OutputConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec!["text".to_string()];
        if let Some(ref path) = self.json_output {
            parts.push(format!("json={}", path.display()));
        }
        if self.per_philosopher {
            parts.push("per_philosopher".to_string());
        }
        write!(f, "{}", parts.join(", "))
    }
}

impl fmt::Display for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.verify {
            parts.push("verify");
        }
        if self.dry_run {
            parts.push("dry_run");
        }
        if parts.is_empty() {
            write!(f, "default")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
