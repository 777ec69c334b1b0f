//! Philosophers CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use philosophers::config::{cli::Cli, toml as config_toml, validator, Config};
use philosophers::output::{json, text};
use philosophers::{logging, Table};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    logging::setup_tracing(config.output.verbosity)?;

    validator::validate_config(&config).context("Configuration validation failed")?;

    println!("Philosophers v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print!("{}", config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Dinner is served...");
    println!();

    let stats = Table::new(config.clone()).run()?;

    text::print_results(&stats, &config).context("Failed to print results")?;

    if let Some(ref path) = config.output.json_output {
        let report = json::JsonReport::new(&stats, &config);
        json::write_json_output(path, &report)?;
        info!(path = %path.display(), "wrote JSON report");
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

/// Config file (if any) with CLI options merged on top
fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => config_toml::parse_toml_file(path)?,
        None => Config::default(),
    };
    config_toml::merge_cli_with_config(cli, base)
}
