//! Sentinel Core - observation primitives for the Sentinel monitor
//!
//! This crate provides the foundational layer shared by both monitors:
//! - Directory snapshots (name -> mtime/size)
//! - File metadata descriptors
//! - Snapshot diffing and change events
//! - Metric samples
//! - The unit-of-work trait driven by the scheduler

pub mod diff;
pub mod event;
pub mod metadata;
pub mod sample;
pub mod snapshot;
pub mod task;

// Re-export main types for convenience
pub use diff::{detect_changes, SnapshotDiff};
pub use event::{Change, ChangeEvent, ChangeKind};
pub use metadata::{describe, filemode, Descriptor, DirMetadata, Metadata, MetadataSource};
pub use sample::{MetricSample, ProcessUsage};
pub use snapshot::{DirScanner, FileStamp, Snapshot, SnapshotSource};
pub use task::PollTask;

use chrono::{DateTime, Local};

/// Common result type used throughout sentinel-core
pub type Result<T> = anyhow::Result<T>;

/// Timestamp layout used in every log row and console line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a local timestamp the way the logs store it
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
