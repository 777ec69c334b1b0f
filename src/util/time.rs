//! Timing utilities

use crate::config::timing::DelayMode;
use std::time::{Duration, Instant};

/// Spend `duration` the way `mode` says
///
/// Returns the time actually spent, which for `Sleep` is usually a little
/// longer than asked.
pub fn pause(duration: Duration, mode: DelayMode) -> Duration {
    let start = Instant::now();
    match mode {
        DelayMode::Sleep => {
            if !duration.is_zero() {
                std::thread::sleep(duration);
            }
        }
        DelayMode::Spin => {
            while start.elapsed() < duration {
                std::hint::spin_loop();
            }
        }
    }
    start.elapsed()
}

/// Format a duration in human-readable form
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use philosophers::util::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
/// assert_eq!(format_duration(Duration::from_nanos(1500)), "1.50us");
/// assert_eq!(format_duration(Duration::from_micros(2500)), "2.50ms");
/// assert_eq!(format_duration(Duration::from_secs(5)), "5.00s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos < 1_000 {
        format!("{}ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.2}us", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2}ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2}s", nanos as f64 / 1_000_000_000.0)
    }
}

/// Format a rate (events per second)
///
/// ```
/// use philosophers::util::time::format_rate;
///
/// assert_eq!(format_rate(12.3456), "12.35");
/// assert_eq!(format_rate(1500.0), "1.50K");
/// ```
pub fn format_rate(rate: f64) -> String {
    if rate < 1_000.0 {
        format!("{:.2}", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.2}K", rate / 1_000.0)
    } else {
        format!("{:.2}M", rate / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_sleep() {
        let spent = pause(Duration::from_millis(5), DelayMode::Sleep);
        assert!(spent >= Duration::from_millis(5));
    }

    #[test]
    fn test_pause_spin() {
        let spent = pause(Duration::from_millis(2), DelayMode::Spin);
        assert!(spent >= Duration::from_millis(2));
    }

    #[test]
    fn test_pause_zero() {
        let spent = pause(Duration::ZERO, DelayMode::Sleep);
        assert!(spent < Duration::from_millis(50));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_nanos(500)), "500ns");
        assert_eq!(format_duration(Duration::from_micros(1500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(0.0), "0.00");
        assert_eq!(format_rate(999.0), "999.00");
        assert_eq!(format_rate(1_500_000.0), "1.50M");
    }
}
