//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Philosophers - dining philosophers with pluggable fork coordinators
///
/// Options left unset keep the value from the config file (or the built-in
/// default when no file is given).
#[derive(Parser, Debug)]
#[command(name = "philosophers")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI options override it)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Table Options ===
    /// Number of philosophers seated at the table
    #[arg(short = 'n', long)]
    pub philosophers: Option<usize>,

    /// Coordinator algorithm
    #[arg(short = 's', long, value_enum)]
    pub strategy: Option<StrategyType>,

    /// Refusals before a hungry philosopher is marked starving (monitor only)
    #[arg(long)]
    pub starvation_threshold: Option<u32>,

    // === Completion Options ===
    /// Stop once every philosopher has eaten this many times
    #[arg(long, conflicts_with_all = ["duration", "forever"])]
    pub meals: Option<u64>,

    /// Stop after this long (e.g., 10s, 2m, 500ms)
    #[arg(short = 'd', long, conflicts_with = "forever")]
    pub duration: Option<String>,

    /// Run until the process is killed
    #[arg(long)]
    pub forever: bool,

    // === Timing Options ===
    /// Minimum thinking time (e.g., 200ms, 50us, 1s)
    #[arg(long)]
    pub think_min: Option<String>,

    /// Maximum thinking time
    #[arg(long)]
    pub think_max: Option<String>,

    /// Minimum eating time
    #[arg(long)]
    pub eat_min: Option<String>,

    /// Maximum eating time
    #[arg(long)]
    pub eat_max: Option<String>,

    /// Shape of think and eat delays within their ranges
    #[arg(long, value_enum)]
    pub distribution: Option<DistributionType>,

    /// How delays are spent: sleep or spin
    #[arg(long, value_enum)]
    pub delay_mode: Option<DelayModeType>,

    /// Base seed for reproducible delays
    #[arg(long)]
    pub seed: Option<u64>,

    // === Runtime Options ===
    /// Check neighbor exclusion while philosophers eat
    #[arg(long)]
    pub verify: bool,

    /// Validate configuration and exit without running
    #[arg(long)]
    pub dry_run: bool,

    // === Output Options ===
    /// Write a JSON report to this path
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Show one row per philosopher in the text report
    #[arg(long)]
    pub per_philosopher: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Coordinator algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    /// Single lock over the table with one wait slot per seat
    Monitor,
    /// Per-fork locks taken in increasing order
    Hierarchy,
}

/// Delay distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistributionType {
    /// Uniform between min and max
    Uniform,
    /// Always the minimum
    Fixed,
    /// Normal around the midpoint of min and max
    Gaussian,
}

/// Delay mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DelayModeType {
    /// Sleep (yields the CPU)
    Sleep,
    /// Busy-wait (burns CPU, tighter timing)
    Spin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_args() {
        let cli = Cli::try_parse_from(["philosophers"]).unwrap();
        assert!(cli.philosophers.is_none());
        assert!(cli.strategy.is_none());
        assert!(!cli.forever);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_full_args() {
        let cli = Cli::try_parse_from([
            "philosophers",
            "-n",
            "7",
            "-s",
            "hierarchy",
            "--meals",
            "20",
            "--think-min",
            "1ms",
            "--think-max",
            "5ms",
            "--distribution",
            "gaussian",
            "--delay-mode",
            "spin",
            "--seed",
            "42",
            "--verify",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.philosophers, Some(7));
        assert_eq!(cli.strategy, Some(StrategyType::Hierarchy));
        assert_eq!(cli.meals, Some(20));
        assert_eq!(cli.think_min.as_deref(), Some("1ms"));
        assert_eq!(cli.distribution, Some(DistributionType::Gaussian));
        assert_eq!(cli.delay_mode, Some(DelayModeType::Spin));
        assert_eq!(cli.seed, Some(42));
        assert!(cli.verify);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_completion_flags_conflict() {
        assert!(Cli::try_parse_from(["philosophers", "--meals", "3", "--forever"]).is_err());
        assert!(Cli::try_parse_from(["philosophers", "--meals", "3", "-d", "5s"]).is_err());
        assert!(Cli::try_parse_from(["philosophers", "-d", "5s", "--forever"]).is_err());
    }
}
