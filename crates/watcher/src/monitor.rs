//! Polling directory monitor
//!
//! Infers changes by scanning the watched directory on every poll and
//! diffing against the scan before it. No OS change notifications are used.

use anyhow::{Context, Result};
use chrono::Local;
use sentinel_core::{
    detect_changes, ChangeEvent, DirMetadata, DirScanner, MetadataSource, Snapshot,
    SnapshotSource,
};
use std::path::Path;

/// Directory monitor holding the previous snapshot
///
/// The previous snapshot is the only state kept between polls and is
/// owned by this value alone.
pub struct DirectoryMonitor<S = DirScanner, M = DirMetadata> {
    source: S,
    metadata: M,
    previous: Snapshot,
}

impl DirectoryMonitor {
    /// Watch `dir` on disk, taking the baseline snapshot now
    ///
    /// Creates the directory if it does not exist yet.
    pub fn watch(dir: &Path) -> Result<Self> {
        Self::with_sources(DirScanner::new(dir), DirMetadata::new(dir))
            .with_context(|| format!("Failed to start watching {}", dir.display()))
    }
}

impl<S: SnapshotSource, M: MetadataSource> DirectoryMonitor<S, M> {
    /// Build a monitor over arbitrary snapshot/metadata providers
    pub fn with_sources(source: S, metadata: M) -> Result<Self> {
        let previous = source.snapshot()?;
        Ok(Self {
            source,
            metadata,
            previous,
        })
    }

    /// Snapshot the next poll will diff against
    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// Scan once and return the changes since the last scan
    ///
    /// On scan failure the previous snapshot is kept, so a directory that is
    /// briefly unreadable does not show up as a burst of deletions.
    pub fn poll(&mut self) -> Result<Vec<ChangeEvent>> {
        let current = self.source.snapshot()?;
        let events = detect_changes(&self.previous, &current, &self.metadata, Local::now());
        self.previous = current;
        Ok(events)
    }
}
