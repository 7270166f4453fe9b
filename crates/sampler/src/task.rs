//! Metrics sampler tick: sample, echo, append

use crate::host::{HostSampler, ResourceProvider};
use anyhow::Result;
use sentinel_core::{PollTask, ProcessUsage};
use sentinel_journal::{LogStore, MetricRow, WritePolicy};
use tracing::{error, info, warn};

/// Name used for this monitor in logs
pub const MONITOR_NAME: &str = "sys_monitor";

/// Drives a [`ResourceProvider`] and records its samples
pub struct MetricsTask<P = HostSampler> {
    provider: P,
    store: LogStore,
    top_n: usize,
    policy: WritePolicy,
}

impl<P: ResourceProvider> MetricsTask<P> {
    /// `top_n` is how many processes the console echo names; 0 disables it
    pub fn new(provider: P, store: LogStore, top_n: usize, policy: WritePolicy) -> Self {
        Self {
            provider,
            store,
            top_n,
            policy,
        }
    }

    fn top_processes(&mut self) -> Vec<ProcessUsage> {
        if self.top_n == 0 {
            return Vec::new();
        }
        self.provider.top_n_by_cpu(self.top_n).unwrap_or_else(|e| {
            warn!(target: "sys_monitor", "Process ranking failed: {:#}", e);
            Vec::new()
        })
    }
}

impl<P: ResourceProvider> PollTask for MetricsTask<P> {
    fn name(&self) -> &'static str {
        MONITOR_NAME
    }

    fn tick(&mut self) -> Result<()> {
        let sample = match self.provider.sample() {
            Ok(sample) => sample,
            Err(e) => {
                error!(target: "sys_monitor", "Sampling failed, skipping tick: {:#}", e);
                return Ok(());
            }
        };

        let top = self
            .top_processes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            target: "sys_monitor",
            "CPU: {:.1}% | RAM: {:.1}% | Top: {}",
            sample.cpu_percent,
            sample.ram_percent,
            top
        );

        let row = MetricRow::from(&sample);
        self.policy.apply(MONITOR_NAME, self.store.append(&row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use sentinel_core::MetricSample;
    use sentinel_journal::METRICS_FILE;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Replays scripted readings, then fails
    struct Scripted {
        samples: VecDeque<Result<MetricSample>>,
        ranking_calls: usize,
    }

    impl Scripted {
        fn new(samples: Vec<Result<MetricSample>>) -> Self {
            Self {
                samples: samples.into(),
                ranking_calls: 0,
            }
        }
    }

    impl ResourceProvider for Scripted {
        fn sample(&mut self) -> Result<MetricSample> {
            self.samples
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
        }

        fn top_n_by_cpu(&mut self, n: usize) -> Result<Vec<ProcessUsage>> {
            self.ranking_calls += 1;
            Ok((0..n)
                .map(|i| ProcessUsage {
                    name: format!("p{}", i),
                    cpu_percent: 10.0 - i as f32,
                })
                .collect())
        }
    }

    fn sample(cpu: f64, ram: f64) -> Result<MetricSample> {
        Ok(MetricSample::new(Local::now(), cpu, ram, 42.123, 321))
    }

    fn task(temp_dir: &TempDir, provider: Scripted, top_n: usize) -> MetricsTask<Scripted> {
        let store = LogStore::open_for::<MetricRow>(temp_dir.path().join(METRICS_FILE)).unwrap();
        MetricsTask::new(provider, store, top_n, WritePolicy::Skip)
    }

    #[test]
    fn test_tick_appends_one_row_per_sample() {
        let temp_dir = TempDir::new().unwrap();
        let mut task = task(&temp_dir, Scripted::new(vec![sample(12.34, 56.78), sample(1.0, 2.0)]), 3);

        task.tick().unwrap();
        task.tick().unwrap();

        let rows: Vec<MetricRow> = task.store.read().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cpu_percent, 12.3);
        assert_eq!(rows[0].ram_percent, 56.8);
        assert_eq!(rows[0].disk_free_gb, 42.12);
        assert_eq!(rows[0].process_count, 321);
        assert_eq!(task.provider.ranking_calls, 2);
    }

    #[test]
    fn test_failed_sample_skips_row_and_keeps_running() {
        let temp_dir = TempDir::new().unwrap();
        let mut task = task(
            &temp_dir,
            Scripted::new(vec![Err(anyhow::anyhow!("no disk")), sample(5.0, 5.0)]),
            3,
        );

        assert!(task.tick().is_ok());
        assert_eq!(task.store.row_count().unwrap(), 0);

        task.tick().unwrap();
        assert_eq!(task.store.row_count().unwrap(), 1);
    }

    #[test]
    fn test_zero_top_n_skips_ranking() {
        let temp_dir = TempDir::new().unwrap();
        let mut task = task(&temp_dir, Scripted::new(vec![sample(5.0, 5.0)]), 0);

        task.tick().unwrap();
        assert_eq!(task.provider.ranking_calls, 0);
        assert_eq!(task.store.row_count().unwrap(), 1);
    }

    #[test]
    fn test_row_layout_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let mut task = task(&temp_dir, Scripted::new(vec![sample(7.0, 8.25)]), 1);
        task.tick().unwrap();

        let content = std::fs::read_to_string(task.store.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Timestamp,CPU_Usage(%),RAM_Used(%),Disk_Free(GB),Process_Count");
        assert!(lines[1].ends_with(",7.0,8.3,42.12,321"), "{}", lines[1]);
    }
}
