//! Logging setup
//!
//! Logs go to stderr so the report on stdout stays clean. `RUST_LOG`, when
//! set, replaces the level chosen with `-v`:
//!
//! - `RUST_LOG=philosophers=debug` - every philosopher's think/eat cycle
//! - `RUST_LOG=philosophers::coordinator=trace` - every grant and release

use crate::Result;
use tracing_subscriber::EnvFilter;

/// Level for a `-v` count: warn, info, debug, then trace
pub fn level_for_verbosity(verbosity: u8) -> tracing::Level {
    match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Install the global subscriber
///
/// Fails if one is already installed.
pub fn setup_tracing(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level_for_verbosity(verbosity).to_string().to_lowercase();
        EnvFilter::new(level)
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_thread_names(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
