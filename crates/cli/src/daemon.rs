//! Monitoring runner
//!
//! Drives the directory monitor and the metrics sampler as two independent
//! loops on the tokio runtime. Each loop sleeps for its interval, then runs
//! one tick on the blocking pool; the loops share nothing but the
//! cancellation token.

use crate::config::Config;
use anyhow::{Context, Result};
use sentinel_core::PollTask;
use sentinel_journal::{DirEventRow, LogStore, MetricRow};
use sentinel_sampler::{HostSampler, MetricsTask, ResourceProvider};
use sentinel_watcher::{DirectoryMonitor, DirectoryTask};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Runs both monitors until cancelled
pub struct Runner<P = HostSampler> {
    config: Config,
    provider: P,
}

impl Runner<HostSampler> {
    /// Runner sampling the local host
    pub fn new(config: Config) -> Self {
        let provider = HostSampler::new(config.sampler.cpu_window(), &config.sampler.disk_mount);
        Self { config, provider }
    }
}

impl<P: ResourceProvider> Runner<P> {
    /// Runner with a substitute resource provider
    pub fn with_provider(config: Config, provider: P) -> Self {
        Self { config, provider }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run until `cancel` fires
    ///
    /// Returns once both loops have stopped. A loop stopped by a write
    /// failure under the `abort` policy does not stop the other one; its
    /// error is returned after shutdown.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        let Self { config, provider } = self;
        let paths = &config.paths;
        let policy = config.journal.on_write_error;

        // 1. Bootstrap directories
        paths.bootstrap()?;

        // 2. Open both logs; headers are written only for new files
        let events_store = LogStore::open_for::<DirEventRow>(paths.dir_events_log())?;
        let metrics_store = LogStore::open_for::<MetricRow>(paths.metrics_log())?;

        // 3. Baseline snapshot before the first tick
        let watch_dir = paths.watch_dir.clone();
        let monitor = tokio::task::spawn_blocking(move || DirectoryMonitor::watch(&watch_dir))
            .await
            .context("Baseline scan panicked")??;

        let dir_task = DirectoryTask::new(monitor, events_store, policy);
        let metrics_task =
            MetricsTask::new(provider, metrics_store, config.sampler.top_processes, policy);

        info!(
            "Watching {} every {:?}, sampling host every {:?}",
            paths.watch_dir.display(),
            config.intervals.directory(),
            config.intervals.metrics()
        );

        // 4. Drive both loops until cancelled
        let dir_loop = tokio::spawn(drive(dir_task, config.intervals.directory(), cancel.clone()));
        let metrics_loop =
            tokio::spawn(drive(metrics_task, config.intervals.metrics(), cancel.clone()));

        let (dir_result, metrics_result) = tokio::join!(dir_loop, metrics_loop);
        dir_result.context("Directory monitor loop panicked")??;
        metrics_result.context("Metrics sampler loop panicked")??;

        info!("Monitoring stopped");
        Ok(())
    }

    /// Run until Ctrl+C
    pub async fn run_until_ctrl_c(self) -> Result<()> {
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();

        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, shutting down");
                    trigger.cancel();
                }
                Err(e) => warn!("Cannot listen for Ctrl+C: {}", e),
            }
        });

        self.run(cancel).await
    }
}

/// Drive one task: sleep, tick, repeat until cancelled
///
/// Cancellation is observed during the sleep only, so an in-progress tick
/// always finishes its append. The task moves onto the blocking pool for
/// each tick and comes back with the result.
pub async fn drive<T: PollTask>(
    mut task: T,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<()> {
    let name = task.name();
    debug!("{} loop started ({:?} interval)", name, interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("{} loop cancelled", name);
                return Ok(());
            }
            _ = tokio::time::sleep(interval) => {}
        }

        let (returned, outcome) = tokio::task::spawn_blocking(move || {
            let outcome = task.tick();
            (task, outcome)
        })
        .await
        .with_context(|| format!("{} tick panicked", name))?;
        task = returned;

        if let Err(e) = outcome {
            error!("{} stopped: {:#}", name, e);
            return Err(e.context(format!("{} stopped", name)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counter {
        ticks: Arc<AtomicUsize>,
        fail_at: Option<usize>,
    }

    impl PollTask for Counter {
        fn name(&self) -> &'static str {
            "counter"
        }

        fn tick(&mut self) -> Result<()> {
            let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
            if Some(n) == self.fail_at {
                anyhow::bail!("tick {} failed", n);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_drive_sleeps_before_first_tick() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let task = Counter {
            ticks: ticks.clone(),
            fail_at: None,
        };
        drive(task, Duration::from_millis(10), cancel).await.unwrap();

        assert_eq!(ticks.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drive_ticks_until_cancelled() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let cancel = CancellationToken::new();

        let task = Counter {
            ticks: ticks.clone(),
            fail_at: None,
        };
        let handle = tokio::spawn(drive(task, Duration::from_millis(10), cancel.clone()));

        tokio::time::sleep(Duration::from_millis(150)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();

        let seen = ticks.load(Ordering::SeqCst);
        assert!(seen >= 2, "only {} ticks", seen);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_drive_stops_on_tick_error() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let task = Counter {
            ticks: ticks.clone(),
            fail_at: Some(2),
        };

        let err = drive(task, Duration::from_millis(5), CancellationToken::new())
            .await
            .unwrap_err();

        assert!(format!("{:#}", err).contains("tick 2 failed"));
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
    }
}
