//! Human-readable text output

use crate::config::Config;
use crate::stats::TableStats;
use crate::util::time::{format_duration, format_rate};
use std::io::{self, Write};

/// Print dinner results to stdout
pub fn print_results(stats: &TableStats, config: &Config) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_results(&mut out, stats, config)
}

/// Write dinner results to `out`
///
/// Shows meals and fairness, the wait-latency distribution, and, when
/// `per_philosopher` is set, one row per seat.
pub fn write_results<W: Write>(out: &mut W, stats: &TableStats, config: &Config) -> io::Result<()> {
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out, "                    DINNER RESULTS")?;
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out)?;

    writeln!(out, "Elapsed Time: {:.3}s", stats.elapsed().as_secs_f64())?;
    writeln!(
        out,
        "Table:        {} philosophers, {} strategy",
        stats.philosophers().len(),
        config.table.strategy
    )?;
    writeln!(out)?;

    writeln!(out, "Meals:")?;
    writeln!(
        out,
        "  Total: {} ({} meals/s)",
        stats.total_meals(),
        format_rate(stats.meals_per_second())
    )?;
    writeln!(out, "  Min:   {}", stats.min_meals())?;
    writeln!(out, "  Max:   {}", stats.max_meals())?;
    writeln!(out, "  Fairness (Jain): {:.4}", stats.fairness_index())?;
    if stats.starvation_promotions() > 0 {
        writeln!(out, "  Starvation promotions: {}", stats.starvation_promotions())?;
    }
    writeln!(out)?;

    let wait = stats.wait_latency();
    writeln!(out, "Wait Latency:")?;
    if wait.is_empty() {
        writeln!(out, "  (no requests granted)")?;
    } else {
        let show = |d: Option<std::time::Duration>| d.map(format_duration).unwrap_or_default();
        writeln!(out, "  Min:  {}", show(wait.min()))?;
        writeln!(out, "  Mean: {}", show(wait.mean()))?;
        writeln!(out, "  p50:  {}", show(wait.percentile(50.0)))?;
        writeln!(out, "  p99:  {}", show(wait.percentile(99.0)))?;
        writeln!(out, "  Max:  {}", format_duration(stats.longest_wait()))?;
    }

    if config.output.per_philosopher {
        writeln!(out)?;
        writeln!(out, "Per Philosopher:")?;
        writeln!(
            out,
            "  {:>4}  {:>8}  {:>12}  {:>12}  {:>12}",
            "id", "meals", "mean wait", "max wait", "eating"
        )?;
        for p in stats.philosophers() {
            writeln!(
                out,
                "  {:>4}  {:>8}  {:>12}  {:>12}  {:>12}",
                p.id(),
                p.meals(),
                format_duration(p.mean_wait()),
                format_duration(p.longest_wait()),
                format_duration(p.eat_time())
            )?;
        }
    }

    writeln!(out)?;
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    Ok(())
}
