//! Host resource metric samples

use chrono::{DateTime, Local};
use std::fmt;

/// One reading of host resource usage
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub timestamp: DateTime<Local>,
    /// Whole-system CPU usage over the measurement window
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub disk_free_gb: f64,
    pub process_count: usize,
}

impl MetricSample {
    /// Build a sample, rounding to the precision the metrics log keeps
    /// (CPU/RAM to 0.1, disk to 0.01)
    pub fn new(
        timestamp: DateTime<Local>,
        cpu_percent: f64,
        ram_percent: f64,
        disk_free_gb: f64,
        process_count: usize,
    ) -> Self {
        Self {
            timestamp,
            cpu_percent: round_to(cpu_percent, 1),
            ram_percent: round_to(ram_percent, 1),
            disk_free_gb: round_to(disk_free_gb, 2),
            process_count,
        }
    }
}

/// CPU usage of a single process
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessUsage {
    pub name: String,
    pub cpu_percent: f32,
}

impl fmt::Display for ProcessUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:.1}%)", self.name, self.cpu_percent)
    }
}

/// Round `value` to `places` decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
