//! Directory monitor tick: poll, echo, append

use crate::monitor::DirectoryMonitor;
use anyhow::Result;
use sentinel_core::{DirMetadata, DirScanner, MetadataSource, PollTask, SnapshotSource};
use sentinel_journal::{DirEventRow, LogStore, WritePolicy};
use tracing::{info, warn};

/// Name used for this monitor in logs
pub const MONITOR_NAME: &str = "dir_monitor";

/// Drives a [`DirectoryMonitor`] and records its events
pub struct DirectoryTask<S = DirScanner, M = DirMetadata> {
    monitor: DirectoryMonitor<S, M>,
    store: LogStore,
    policy: WritePolicy,
}

impl<S: SnapshotSource, M: MetadataSource> DirectoryTask<S, M> {
    pub fn new(monitor: DirectoryMonitor<S, M>, store: LogStore, policy: WritePolicy) -> Self {
        Self {
            monitor,
            store,
            policy,
        }
    }
}

impl<S: SnapshotSource, M: MetadataSource> PollTask for DirectoryTask<S, M> {
    fn name(&self) -> &'static str {
        MONITOR_NAME
    }

    fn tick(&mut self) -> Result<()> {
        let events = match self.monitor.poll() {
            Ok(events) => events,
            Err(e) => {
                warn!(target: "dir_monitor", "Scan failed, skipping tick: {:#}", e);
                return Ok(());
            }
        };

        for event in &events {
            info!(target: "dir_monitor", "{}: {}", event.kind(), event.name());
            let row = DirEventRow::from(event);
            self.policy.apply(MONITOR_NAME, self.store.append(&row))?;
        }

        Ok(())
    }
}
