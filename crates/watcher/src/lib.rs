//! Directory watching for Sentinel
//!
//! This crate provides the polling directory monitor:
//! - Baseline snapshot at startup, one rescan per tick
//! - Create/modify/delete inference from successive snapshots
//! - Console echo and append of every event to the directory event log

pub mod monitor;
pub mod task;

pub use monitor::DirectoryMonitor;
pub use task::{DirectoryTask, MONITOR_NAME};
