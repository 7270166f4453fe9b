//! Common utilities for integration tests

#![allow(dead_code)]

pub mod cli;

use anyhow::Result;
use chrono::Local;
use sentinel_cli::config::{Config, IntervalsConfig, PathsConfig};
use sentinel_core::{MetricSample, ProcessUsage};
use sentinel_sampler::ResourceProvider;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Config rooted in a scratch directory with short intervals
pub fn test_config(root: &Path, directory_ms: u64, metrics_ms: u64) -> Config {
    let mut config = Config::default();
    config.paths = PathsConfig {
        watch_dir: root.join("monitored_folder"),
        log_dir: root.join("logs"),
        report_file: root.join("reports").join("final_summary.txt"),
    };
    config.intervals = IntervalsConfig {
        directory_ms,
        metrics_ms,
    };
    config.sampler.cpu_window_ms = 0;
    config
}

/// Resource provider returning a fixed reading, counting calls
#[derive(Clone)]
pub struct FakeProvider {
    pub cpu_percent: f64,
    pub ram_percent: f64,
    pub samples: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn steady(cpu_percent: f64, ram_percent: f64) -> Self {
        Self {
            cpu_percent,
            ram_percent,
            samples: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sample_count(&self) -> usize {
        self.samples.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for FakeProvider {
    fn sample(&mut self) -> Result<MetricSample> {
        self.samples.fetch_add(1, Ordering::SeqCst);
        Ok(MetricSample::new(
            Local::now(),
            self.cpu_percent,
            self.ram_percent,
            100.0,
            42,
        ))
    }

    fn top_n_by_cpu(&mut self, n: usize) -> Result<Vec<ProcessUsage>> {
        Ok(vec![
            ProcessUsage {
                name: "fake".into(),
                cpu_percent: self.cpu_percent as f32,
            };
            n.min(1)
        ])
    }
}

/// Resource provider whose every sample blocks for `hold`
#[derive(Clone)]
pub struct SlowProvider {
    pub hold: Duration,
    pub started: Arc<AtomicUsize>,
    pub finished: Arc<AtomicUsize>,
}

impl SlowProvider {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            started: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for SlowProvider {
    fn sample(&mut self) -> Result<MetricSample> {
        self.started.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.hold);
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(MetricSample::new(Local::now(), 1.0, 1.0, 1.0, 1))
    }

    fn top_n_by_cpu(&mut self, _n: usize) -> Result<Vec<ProcessUsage>> {
        Ok(Vec::new())
    }
}

/// Poll `condition` until it holds or `timeout` passes
pub async fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
