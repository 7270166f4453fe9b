//! Monitor configuration
//!
//! Loaded once at startup from TOML and passed by value into the runner.
//! Lookup order: `--config <path>`, then `./sentinel.toml`, then built-in
//! defaults.

use anyhow::{Context, Result};
use sentinel_journal::{WritePolicy, DIR_EVENTS_FILE, METRICS_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "sentinel.toml";

/// File name of the application log written by `start`
pub const APP_LOG_FILE: &str = "sentinel.log";

const MIN_INTERVAL_MS: u64 = 10;
const MAX_INTERVAL_MS: u64 = 60 * 60 * 1000;
const MAX_CPU_WINDOW_MS: u64 = 60 * 1000;
const MAX_TOP_PROCESSES: usize = 50;

/// Validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("sampler.cpu_window_ms ({window}) must be shorter than intervals.metrics_ms ({interval})")]
    WindowTooLong { window: u64, interval: u64 },

    #[error("{field} must not be empty")]
    EmptyPath { field: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub intervals: IntervalsConfig,
    pub sampler: SamplerConfig,
    pub journal: JournalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory the directory monitor scans (created if missing)
    pub watch_dir: PathBuf,
    /// Directory holding both CSV logs and the application log
    pub log_dir: PathBuf,
    /// Where `report` writes its summary
    pub report_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("./monitored_folder"),
            log_dir: PathBuf::from("./logs"),
            report_file: PathBuf::from("./reports/final_summary.txt"),
        }
    }
}

impl PathsConfig {
    pub fn dir_events_log(&self) -> PathBuf {
        self.log_dir.join(DIR_EVENTS_FILE)
    }

    pub fn metrics_log(&self) -> PathBuf {
        self.log_dir.join(METRICS_FILE)
    }

    pub fn app_log(&self) -> PathBuf {
        self.log_dir.join(APP_LOG_FILE)
    }

    /// Create the watch and log directories, plus the report's parent
    pub fn bootstrap(&self) -> Result<()> {
        std::fs::create_dir_all(&self.watch_dir)
            .with_context(|| format!("Failed to create {}", self.watch_dir.display()))?;
        std::fs::create_dir_all(&self.log_dir)
            .with_context(|| format!("Failed to create {}", self.log_dir.display()))?;
        if let Some(parent) = self.report_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalsConfig {
    pub directory_ms: u64,
    pub metrics_ms: u64,
}

impl Default for IntervalsConfig {
    fn default() -> Self {
        Self {
            directory_ms: 2000,
            metrics_ms: 10000,
        }
    }
}

impl IntervalsConfig {
    pub fn directory(&self) -> Duration {
        Duration::from_millis(self.directory_ms)
    }

    pub fn metrics(&self) -> Duration {
        Duration::from_millis(self.metrics_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Blocking CPU measurement window per tick
    pub cpu_window_ms: u64,
    /// Processes named in the console echo (0 disables ranking)
    pub top_processes: usize,
    /// Path whose disk is reported as free space
    pub disk_mount: PathBuf,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cpu_window_ms: 1000,
            top_processes: 3,
            disk_mount: PathBuf::from("/"),
        }
    }
}

impl SamplerConfig {
    pub fn cpu_window(&self) -> Duration {
        Duration::from_millis(self.cpu_window_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// What a loop does when its log cannot be appended to
    pub on_write_error: WritePolicy,
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `./sentinel.toml` is used
    /// when present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_path(explicit) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Check value ranges
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_range("intervals.directory_ms", self.intervals.directory_ms, MIN_INTERVAL_MS, MAX_INTERVAL_MS)?;
        check_range("intervals.metrics_ms", self.intervals.metrics_ms, MIN_INTERVAL_MS, MAX_INTERVAL_MS)?;
        check_range("sampler.cpu_window_ms", self.sampler.cpu_window_ms, 0, MAX_CPU_WINDOW_MS)?;
        check_range(
            "sampler.top_processes",
            self.sampler.top_processes as u64,
            0,
            MAX_TOP_PROCESSES as u64,
        )?;

        if self.sampler.cpu_window_ms >= self.intervals.metrics_ms {
            return Err(ConfigError::WindowTooLong {
                window: self.sampler.cpu_window_ms,
                interval: self.intervals.metrics_ms,
            });
        }

        for (field, path) in [
            ("paths.watch_dir", &self.paths.watch_dir),
            ("paths.log_dir", &self.paths.log_dir),
            ("paths.report_file", &self.paths.report_file),
            ("sampler.disk_mount", &self.sampler.disk_mount),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath { field });
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> std::result::Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// The file `Config::load` would read, if any
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            local.is_file().then_some(local)
        }
    }
}

/// Commented example configuration holding the defaults
pub fn example_config() -> &'static str {
    r#"# Sentinel configuration
#
# Relative paths resolve against the working directory.

[paths]
# Directory scanned for created/modified/deleted files (created if missing)
watch_dir = "./monitored_folder"
# Holds dir_events.csv, sys_metrics.csv and sentinel.log
log_dir = "./logs"
# Written by `sentinel report`
report_file = "./reports/final_summary.txt"

[intervals]
# Directory scan period (10 - 3,600,000 ms)
directory_ms = 2000
# Metrics sampling period (10 - 3,600,000 ms)
metrics_ms = 10000

[sampler]
# CPU measurement window per sample; must be shorter than metrics_ms
cpu_window_ms = 1000
# Top CPU consumers shown in the console (0 - 50)
top_processes = 3
# Free space is reported for the disk holding this path
disk_mount = "/"

[journal]
# "skip" drops a row that cannot be written; "abort" stops that monitor
on_write_error = "skip"
"#
}
