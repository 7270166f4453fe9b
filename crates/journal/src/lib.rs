//! Append-only monitor logs and report aggregation
//!
//! This crate provides:
//! - Append-only CSV log stores with a fixed header
//! - Row layouts for the directory event and metrics logs
//! - Write-failure policy shared by both monitors
//! - Summary report over both logs

pub mod error;
pub mod report;
pub mod schema;
pub mod store;

// Re-exports
pub use error::JournalError;
pub use report::{EventCounts, MetricsSummary, Report, Status};
pub use schema::{DirEventRow, MetricRow, DIR_EVENTS_FILE, METRICS_FILE};
pub use store::{ensure_header, read_rows, LogRow, LogStore, WritePolicy};

/// Result type for journal operations
pub type Result<T> = anyhow::Result<T>;
