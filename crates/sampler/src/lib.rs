//! Host metrics sampling for Sentinel
//!
//! This crate provides the periodic resource sampler:
//! - CPU usage measured over a short blocking window
//! - RAM usage, free disk space and process count
//! - Top CPU consumers for the console echo
//! - Append of every sample to the metrics log

pub mod host;
pub mod task;

pub use host::{rank_by_cpu, HostSampler, ResourceProvider, DEFAULT_CPU_WINDOW};
pub use task::{MetricsTask, MONITOR_NAME};
