//! Summary report over both monitor logs
//!
//! A pure read-aggregate-format pass: both logs are read in full, nothing is
//! written back into them.

use crate::schema::{DirEventRow, MetricRow};
use crate::store::read_rows;
use anyhow::Result;
use chrono::{DateTime, Local};
use sentinel_core::{format_timestamp, ChangeKind};
use std::fmt;
use std::path::Path;

/// Mean CPU at or above this is reported as HIGH
pub const CPU_HIGH_PERCENT: f64 = 80.0;

/// Mean RAM at or above this is reported as HIGH
pub const RAM_HIGH_PERCENT: f64 = 90.0;

/// Threshold classification of an average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    High,
}

impl Status {
    pub fn classify(value: f64, high_at: f64) -> Self {
        if value < high_at {
            Status::Ok
        } else {
            Status::High
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers apply
        f.pad(match self {
            Status::Ok => "OK",
            Status::High => "HIGH",
        })
    }
}

/// Aggregates over the metrics log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsSummary {
    pub observations: usize,
    pub avg_cpu: f64,
    pub avg_ram: f64,
    pub peak_processes: usize,
}

impl MetricsSummary {
    pub fn from_rows(rows: &[MetricRow]) -> Self {
        if rows.is_empty() {
            return Self::default();
        }

        let n = rows.len() as f64;
        Self {
            observations: rows.len(),
            avg_cpu: rows.iter().map(|r| r.cpu_percent).sum::<f64>() / n,
            avg_ram: rows.iter().map(|r| r.ram_percent).sum::<f64>() / n,
            peak_processes: rows.iter().map(|r| r.process_count).max().unwrap_or(0),
        }
    }

    pub fn cpu_status(&self) -> Status {
        Status::classify(self.avg_cpu, CPU_HIGH_PERCENT)
    }

    pub fn ram_status(&self) -> Status {
        Status::classify(self.avg_ram, RAM_HIGH_PERCENT)
    }
}

/// Per-type counts over the directory event log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub created: usize,
    pub deleted: usize,
    pub modified: usize,
}

impl EventCounts {
    /// Count rows by event type; unknown types are ignored
    pub fn from_rows(rows: &[DirEventRow]) -> Self {
        let mut counts = Self::default();
        for row in rows {
            match row.event_type.parse::<ChangeKind>() {
                Ok(ChangeKind::Created) => counts.created += 1,
                Ok(ChangeKind::Deleted) => counts.deleted += 1,
                Ok(ChangeKind::Modified) => counts.modified += 1,
                Err(_) => {}
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.created + self.deleted + self.modified
    }
}

/// Final summary of a monitoring session
#[derive(Debug, Clone)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub metrics: MetricsSummary,
    pub events: EventCounts,
}

impl Report {
    /// Read both logs and aggregate them
    ///
    /// Missing logs count as empty; malformed rows are skipped.
    pub fn from_logs(metrics_log: &Path, events_log: &Path) -> Result<Self> {
        let metric_rows: Vec<MetricRow> = read_rows(metrics_log)?;
        let event_rows: Vec<DirEventRow> = read_rows(events_log)?;

        Ok(Self {
            generated_at: Local::now(),
            metrics: MetricsSummary::from_rows(&metric_rows),
            events: EventCounts::from_rows(&event_rows),
        })
    }

    /// Render the fixed-format text artifact
    pub fn render(&self) -> String {
        const RULE: &str = "======================================================================";
        const SECTION: &str = "=========================================";
        const THIN: &str = "-----------------------------------------";

        let m = &self.metrics;
        let e = &self.events;
        let mut out = String::new();

        out.push('\n');
        out.push_str(&format!("{}\n", RULE));
        out.push_str(&format!("{:^70}\n", "SENTINEL - HOST MONITORING REPORT"));
        out.push_str(&format!("{}\n", RULE));
        out.push_str(&format!("Generated On: {}\n", format_timestamp(&self.generated_at)));
        out.push_str("Status      : SUCCESS\n");
        out.push_str(&format!("{}\n\n", "-".repeat(70)));

        out.push_str("[1] SYSTEM PERFORMANCE METRICS\n");
        out.push_str(&format!("{}\n", SECTION));
        out.push_str(&format!("Total Observations      : {}\n", m.observations));
        out.push_str(&format!("{}\n", THIN));
        out.push_str("| Metric                | Average       | Status        |\n");
        out.push_str("|-----------------------|---------------|---------------|\n");
        out.push_str(&format!(
            "| CPU Usage             | {:>5.2} %       | {:<14}|\n",
            m.avg_cpu,
            m.cpu_status()
        ));
        out.push_str(&format!(
            "| RAM Usage             | {:>5.2} %       | {:<14}|\n",
            m.avg_ram,
            m.ram_status()
        ));
        out.push_str(&format!(
            "| Peak Process Count    | {:<5}         | {:<14}|\n",
            m.peak_processes, "Normal"
        ));
        out.push_str(&format!("{}\n\n", SECTION));

        out.push_str("[2] DIRECTORY SECURITY LOG\n");
        out.push_str(&format!("{}\n", SECTION));
        out.push_str(&format!("Monitored Events Detected: {}\n", e.total()));
        out.push_str(&format!("{}\n", THIN));
        out.push_str("| Event Type            | Count         |\n");
        out.push_str("|-----------------------|---------------|\n");
        out.push_str(&format!("| [+] Files Created     | {:<5}         |\n", e.created));
        out.push_str(&format!("| [-] Files Deleted     | {:<5}         |\n", e.deleted));
        out.push_str(&format!("| [~] Files Modified    | {:<5}         |\n", e.modified));
        out.push_str(&format!("{}\n\n", SECTION));

        out.push_str("[3] AUTOMATED ANALYSIS\n");
        out.push_str(&format!("{}\n", THIN));
        out.push_str("The system has monitored the target directory and host\n");
        out.push_str("performance metrics. Use the CSV logs for granular detail.\n");
        out.push_str(&format!("{}\n", RULE));

        out
    }
}
