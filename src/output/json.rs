//! JSON output formatting
//!
//! One report per dinner: the configuration that produced it, table-wide
//! totals, the merged wait-latency percentiles, and every seat's numbers.

use crate::config::Config;
use crate::stats::histogram::LatencyHistogram;
use crate::stats::{PhilosopherStats, TableStats};
use crate::util::time::format_duration;
use crate::Result;
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both microseconds and human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDuration {
    pub micros: u64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            micros: d.as_micros() as u64,
            human: format_duration(d),
        }
    }
}

/// Wait-latency percentiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonLatency {
    pub samples: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p50: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p90: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p99: Option<JsonDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<JsonDuration>,
}

/// One seat's results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonPhilosopher {
    pub id: usize,
    pub meals: u64,
    pub think_time: JsonDuration,
    pub eat_time: JsonDuration,
    pub wait_time: JsonDuration,
    pub longest_wait: JsonDuration,
}

/// Table-wide totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSummary {
    pub elapsed: JsonDuration,
    pub total_meals: u64,
    pub min_meals: u64,
    pub max_meals: u64,
    pub meals_per_second: f64,
    pub fairness_index: f64,
    pub grants: u64,
    pub starvation_promotions: u64,
}

/// Complete report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub timestamp: String,
    pub config: Config,
    pub summary: JsonSummary,
    pub wait_latency: JsonLatency,
    pub philosophers: Vec<JsonPhilosopher>,
}

impl JsonReport {
    pub fn new(stats: &TableStats, config: &Config) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            config: config.clone(),
            summary: JsonSummary {
                elapsed: JsonDuration::from_duration(stats.elapsed()),
                total_meals: stats.total_meals(),
                min_meals: stats.min_meals(),
                max_meals: stats.max_meals(),
                meals_per_second: stats.meals_per_second(),
                fairness_index: stats.fairness_index(),
                grants: stats.grants(),
                starvation_promotions: stats.starvation_promotions(),
            },
            wait_latency: extract_latency(stats.wait_latency()),
            philosophers: stats.philosophers().iter().map(extract_philosopher).collect(),
        }
    }
}

fn extract_latency(hist: &LatencyHistogram) -> JsonLatency {
    let at = |p: f64| hist.percentile(p).map(JsonDuration::from_duration);
    JsonLatency {
        samples: hist.len(),
        min: hist.min().map(JsonDuration::from_duration),
        mean: hist.mean().map(JsonDuration::from_duration),
        p50: at(50.0),
        p90: at(90.0),
        p99: at(99.0),
        max: hist.max().map(JsonDuration::from_duration),
    }
}

fn extract_philosopher(p: &PhilosopherStats) -> JsonPhilosopher {
    JsonPhilosopher {
        id: p.id(),
        meals: p.meals(),
        think_time: JsonDuration::from_duration(p.think_time()),
        eat_time: JsonDuration::from_duration(p.eat_time()),
        wait_time: JsonDuration::from_duration(p.wait_time()),
        longest_wait: JsonDuration::from_duration(p.longest_wait()),
    }
}

/// Write the JSON report to `output_path`
pub fn write_json_output(output_path: &Path, report: &JsonReport) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, report)
        .with_context(|| format!("Failed to write JSON output: {}", output_path.display()))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> TableStats {
        let seats = (0..2)
            .map(|id| {
                let mut p = PhilosopherStats::new(id);
                p.record_think(Duration::from_millis(4));
                p.record_wait(Duration::from_micros(1500));
                p.record_meal(Duration::from_millis(3));
                p
            })
            .collect();
        TableStats::new(seats, Duration::from_secs(1))
            .unwrap()
            .with_event_counts(2, 0)
    }

    #[test]
    fn test_report_contents() {
        let report = JsonReport::new(&sample_stats(), &Config::default());
        assert_eq!(report.summary.total_meals, 2);
        assert_eq!(report.summary.grants, 2);
        assert_eq!(report.wait_latency.samples, 2);
        assert_eq!(report.philosophers.len(), 2);
        assert_eq!(report.philosophers[1].id, 1);
        assert_eq!(report.philosophers[0].eat_time.micros, 3000);
        assert_eq!(report.philosophers[0].longest_wait.human, "1.50ms");
        assert!(report.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_empty_latency_fields_are_omitted() {
        let stats = TableStats::new(vec![PhilosopherStats::new(0)], Duration::ZERO).unwrap();
        let value = serde_json::to_value(JsonReport::new(&stats, &Config::default())).unwrap();
        let latency = &value["wait_latency"];
        assert_eq!(latency["samples"], 0);
        assert!(latency.get("p99").is_none());
    }

    #[test]
    fn test_write_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinner.json");

        let report = JsonReport::new(&sample_stats(), &Config::default());
        write_json_output(&path, &report).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["summary"]["total_meals"], 2);
        assert_eq!(value["config"]["table"]["strategy"], "monitor");
        assert_eq!(value["config"]["completion"]["mode"], "duration");
    }
}
