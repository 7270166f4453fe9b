//! Host resource sampling via sysinfo

use anyhow::Result;
use chrono::Local;
use sentinel_core::{MetricSample, ProcessUsage};
use std::path::{Path, PathBuf};
use std::time::Duration;
use sysinfo::{Disks, ProcessesToUpdate, System, MINIMUM_CPU_UPDATE_INTERVAL};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Default length of the blocking CPU measurement window
pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_secs(1);

/// Source of host resource readings
///
/// `HostSampler` reads the real machine; tests substitute scripted
/// providers.
pub trait ResourceProvider: Send + 'static {
    /// Take one reading; may block for the CPU measurement window
    fn sample(&mut self) -> Result<MetricSample>;

    /// The `n` processes using the most CPU, highest first
    fn top_n_by_cpu(&mut self, n: usize) -> Result<Vec<ProcessUsage>>;
}

/// Reads CPU, memory, disk and process figures from the local host
pub struct HostSampler {
    sys: System,
    disks: Disks,
    cpu_window: Duration,
    disk_mount: PathBuf,
}

impl HostSampler {
    /// Create a sampler
    ///
    /// `cpu_window` is floored at the shortest interval sysinfo can measure
    /// over. Free disk space is reported for the disk holding `disk_mount`.
    pub fn new(cpu_window: Duration, disk_mount: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        Self {
            sys,
            disks: Disks::new_with_refreshed_list(),
            cpu_window: cpu_window.max(MINIMUM_CPU_UPDATE_INTERVAL),
            disk_mount: disk_mount.into(),
        }
    }

    /// Free bytes on the disk whose mount point is the longest prefix of
    /// the configured path
    fn disk_free_bytes(&self) -> Option<u64> {
        self.disks
            .list()
            .iter()
            .filter(|disk| self.disk_mount.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| disk.available_space())
    }

    /// Processes from the last refresh, without the per-thread entries
    /// sysinfo lists alongside them on Linux
    fn live_processes(&self) -> impl Iterator<Item = &sysinfo::Process> {
        self.sys
            .processes()
            .values()
            .filter(|p| p.thread_kind().is_none())
    }

    pub fn disk_mount(&self) -> &Path {
        &self.disk_mount
    }
}

impl Default for HostSampler {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WINDOW, "/")
    }
}

impl ResourceProvider for HostSampler {
    fn sample(&mut self) -> Result<MetricSample> {
        // Two refreshes bracketing the window yield a rate, not a since-boot total
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        std::thread::sleep(self.cpu_window);
        self.sys.refresh_cpu_usage();
        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let cpu_percent = f64::from(self.sys.global_cpu_usage());

        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        if total == 0 {
            anyhow::bail!("Host reported zero total memory");
        }
        let ram_percent = self.sys.used_memory() as f64 / total as f64 * 100.0;

        self.disks.refresh();
        if self.disks.list().is_empty() {
            self.disks.refresh_list();
        }
        let free = self.disk_free_bytes().ok_or_else(|| {
            anyhow::anyhow!("No mounted disk holds {}", self.disk_mount.display())
        })?;

        Ok(MetricSample::new(
            Local::now(),
            cpu_percent,
            ram_percent,
            free as f64 / BYTES_PER_GB,
            self.live_processes().count(),
        ))
    }

    /// Uses per-process usage from the most recent [`sample`](Self::sample)
    fn top_n_by_cpu(&mut self, n: usize) -> Result<Vec<ProcessUsage>> {
        let usage = self.live_processes().map(|p| ProcessUsage {
            name: p.name().to_string_lossy().into_owned(),
            cpu_percent: p.cpu_usage(),
        });
        Ok(rank_by_cpu(usage, n))
    }
}

/// Keep the `n` highest CPU consumers, highest first
///
/// The sort is stable, so ties keep their enumeration order.
pub fn rank_by_cpu(usage: impl IntoIterator<Item = ProcessUsage>, n: usize) -> Vec<ProcessUsage> {
    let mut ranked: Vec<ProcessUsage> = usage.into_iter().collect();
    ranked.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    ranked.truncate(n);
    ranked
}
