//! Snapshot diffing
//!
//! Changes are inferred purely from two successive snapshots:
//! - created  = names(current) - names(previous)
//! - deleted  = names(previous) - names(current)
//! - modified = names in both whose (mtime, size) differ
//!
//! A file deleted and recreated with an identical (mtime, size) between two
//! scans is indistinguishable from an untouched one and yields no event.
//! There is no content hashing or inode tracking.

use crate::event::{Change, ChangeEvent};
use crate::metadata::MetadataSource;
use crate::snapshot::Snapshot;
use chrono::{DateTime, Local};

/// Names that changed between two snapshots
///
/// Order within each list follows map iteration and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
}

impl SnapshotDiff {
    /// Compute the diff between two snapshots (no I/O)
    pub fn between(previous: &Snapshot, current: &Snapshot) -> Self {
        let mut diff = Self::default();

        for (name, stamp) in current.iter() {
            match previous.get(name) {
                None => diff.created.push(name.to_string()),
                Some(old) if old != stamp => diff.modified.push(name.to_string()),
                Some(_) => {}
            }
        }

        for (name, _) in previous.iter() {
            if !current.contains(name) {
                diff.deleted.push(name.to_string());
            }
        }

        diff
    }

    /// Check if there are any changes
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.modified.is_empty()
    }

    /// Total number of changed names
    pub fn len(&self) -> usize {
        self.created.len() + self.deleted.len() + self.modified.len()
    }

    /// Turn the diff into events, looking up metadata for created and
    /// modified names
    ///
    /// Events come out grouped as Created*, Deleted*, Modified*. Lookups hit
    /// the current on-disk state, which may already have moved on; a file
    /// gone by then is reported with [`Metadata::Absent`](crate::Metadata::Absent).
    pub fn into_events<M>(self, source: &M, detected_at: DateTime<Local>) -> Vec<ChangeEvent>
    where
        M: MetadataSource + ?Sized,
    {
        let mut events = Vec::with_capacity(self.len());

        for name in self.created {
            let metadata = source.describe(&name);
            events.push(ChangeEvent::new(detected_at, Change::Created { name, metadata }));
        }

        for name in self.deleted {
            events.push(ChangeEvent::new(detected_at, Change::Deleted { name }));
        }

        for name in self.modified {
            let metadata = source.describe(&name);
            events.push(ChangeEvent::new(detected_at, Change::Modified { name, metadata }));
        }

        events
    }
}

/// Diff two snapshots and produce timestamped change events
pub fn detect_changes<M>(
    previous: &Snapshot,
    current: &Snapshot,
    source: &M,
    detected_at: DateTime<Local>,
) -> Vec<ChangeEvent>
where
    M: MetadataSource + ?Sized,
{
    SnapshotDiff::between(previous, current).into_events(source, detected_at)
}
