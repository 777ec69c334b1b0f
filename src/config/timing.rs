//! Timing and completion definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a philosopher thinks or eats
///
/// All values are microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum DelayConfig {
    Uniform { min_us: u64, max_us: u64 },
    Fixed { us: u64 },
    Gaussian { mean_us: u64, stddev_us: u64 },
}

impl Default for DelayConfig {
    fn default() -> Self {
        // 200-800 ms, the classic table
        Self::Uniform {
            min_us: 200_000,
            max_us: 800_000,
        }
    }
}

/// How a delay is spent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DelayMode {
    Sleep,
    Spin,
}

impl Default for DelayMode {
    fn default() -> Self {
        Self::Sleep
    }
}

/// When a dinner ends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CompletionMode {
    /// Every philosopher eats `count` times
    Meals { count: u64 },
    /// Stop after a wall-clock budget
    Duration { millis: u64 },
    /// Run until the process is killed
    Forever,
}

impl Default for CompletionMode {
    fn default() -> Self {
        Self::Duration { millis: 10_000 }
    }
}

impl fmt::Display for DelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayConfig::Uniform { min_us, max_us } => {
                write!(f, "uniform {}..{}", format_us(*min_us), format_us(*max_us))
            }
            DelayConfig::Fixed { us } => write!(f, "fixed {}", format_us(*us)),
            DelayConfig::Gaussian { mean_us, stddev_us } => {
                write!(f, "gaussian mean={} stddev={}", format_us(*mean_us), format_us(*stddev_us))
            }
        }
    }
}

impl fmt::Display for DelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayMode::Sleep => write!(f, "sleep"),
            DelayMode::Spin => write!(f, "spin"),
        }
    }
}

impl fmt::Display for CompletionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionMode::Meals { count } => write!(f, "{} meal(s) each", count),
            CompletionMode::Duration { millis } => write!(f, "{}", format_ms(*millis)),
            CompletionMode::Forever => write!(f, "forever"),
        }
    }
}

fn format_ms(ms: u64) -> String {
    if ms >= 1_000 && ms % 1_000 == 0 {
        format!("{}s", ms / 1_000)
    } else {
        format!("{}ms", ms)
    }
}

fn format_us(us: u64) -> String {
    if us >= 1_000_000 && us % 1_000_000 == 0 {
        format!("{}s", us / 1_000_000)
    } else if us >= 1_000 && us % 1_000 == 0 {
        format!("{}ms", us / 1_000)
    } else {
        format!("{}us", us)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(
            DelayConfig::default(),
            DelayConfig::Uniform { min_us: 200_000, max_us: 800_000 }
        );
        assert_eq!(DelayMode::default(), DelayMode::Sleep);
        assert_eq!(CompletionMode::default(), CompletionMode::Duration { millis: 10_000 });
    }

    #[test]
    fn test_display() {
        assert_eq!(DelayConfig::default().to_string(), "uniform 200ms..800ms");
        assert_eq!(DelayConfig::Fixed { us: 1500 }.to_string(), "fixed 1500us");
        assert_eq!(CompletionMode::Meals { count: 3 }.to_string(), "3 meal(s) each");
        assert_eq!(CompletionMode::Duration { millis: 2000 }.to_string(), "2s");
        assert_eq!(CompletionMode::Forever.to_string(), "forever");
    }

    #[test]
    fn test_display_huge_duration() {
        assert_eq!(
            CompletionMode::Duration { millis: u64::MAX }.to_string(),
            format!("{}ms", u64::MAX)
        );
        assert_eq!(CompletionMode::Duration { millis: 250 }.to_string(), "250ms");
    }
}
