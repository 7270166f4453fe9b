//! Row layouts of the two monitor logs

use crate::store::LogRow;
use sentinel_core::{format_timestamp, ChangeEvent, MetricSample};
use serde::Deserialize;

/// File name of the directory event log inside the log directory
pub const DIR_EVENTS_FILE: &str = "dir_events.csv";

/// File name of the metrics log inside the log directory
pub const METRICS_FILE: &str = "sys_metrics.csv";

/// Metadata column value for deletions
pub const DELETED_METADATA: &str = "N/A";

/// One row of the directory event log
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirEventRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Event_Type")]
    pub event_type: String,
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Metadata")]
    pub metadata: String,
}

impl From<&ChangeEvent> for DirEventRow {
    fn from(event: &ChangeEvent) -> Self {
        Self {
            timestamp: format_timestamp(&event.detected_at),
            event_type: event.kind().to_string(),
            filename: event.name().to_string(),
            metadata: event
                .change
                .metadata()
                .map(|m| m.to_string())
                .unwrap_or_else(|| DELETED_METADATA.to_string()),
        }
    }
}

impl LogRow for DirEventRow {
    const COLUMNS: &'static [&'static str] = &["Timestamp", "Event_Type", "Filename", "Metadata"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            self.event_type.clone(),
            self.filename.clone(),
            self.metadata.clone(),
        ]
    }
}

/// One row of the metrics log
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "CPU_Usage(%)")]
    pub cpu_percent: f64,
    #[serde(rename = "RAM_Used(%)")]
    pub ram_percent: f64,
    #[serde(rename = "Disk_Free(GB)")]
    pub disk_free_gb: f64,
    #[serde(rename = "Process_Count")]
    pub process_count: usize,
}

impl From<&MetricSample> for MetricRow {
    fn from(sample: &MetricSample) -> Self {
        Self {
            timestamp: format_timestamp(&sample.timestamp),
            cpu_percent: sample.cpu_percent,
            ram_percent: sample.ram_percent,
            disk_free_gb: sample.disk_free_gb,
            process_count: sample.process_count,
        }
    }
}

impl LogRow for MetricRow {
    const COLUMNS: &'static [&'static str] = &[
        "Timestamp",
        "CPU_Usage(%)",
        "RAM_Used(%)",
        "Disk_Free(GB)",
        "Process_Count",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.timestamp.clone(),
            format!("{:.1}", self.cpu_percent),
            format!("{:.1}", self.ram_percent),
            format!("{:.2}", self.disk_free_gb),
            self.process_count.to_string(),
        ]
    }
}
