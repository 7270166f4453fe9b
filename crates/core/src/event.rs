//! Change events produced by snapshot diffing

use crate::metadata::Metadata;
use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;

/// Type of directory change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Deleted,
    Modified,
}

impl ChangeKind {
    /// Label written to the `Event_Type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "CREATED",
            ChangeKind::Deleted => "DELETED",
            ChangeKind::Modified => "MODIFIED",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeKind {
    type Err = anyhow::Error;

    /// Case-insensitive, surrounding whitespace ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CREATED" => Ok(ChangeKind::Created),
            "DELETED" => Ok(ChangeKind::Deleted),
            "MODIFIED" => Ok(ChangeKind::Modified),
            other => anyhow::bail!("Unknown event type: '{}'", other),
        }
    }
}

/// A single inferred change to one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Name appeared since the previous snapshot
    Created { name: String, metadata: Metadata },
    /// Name disappeared since the previous snapshot
    Deleted { name: String },
    /// Name present in both snapshots with a different (mtime, size)
    Modified { name: String, metadata: Metadata },
}

impl Change {
    pub fn name(&self) -> &str {
        match self {
            Change::Created { name, .. } | Change::Deleted { name } | Change::Modified { name, .. } => {
                name
            }
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Created { .. } => ChangeKind::Created,
            Change::Deleted { .. } => ChangeKind::Deleted,
            Change::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// Metadata fetched at detection time; `None` for deletions
    pub fn metadata(&self) -> Option<&Metadata> {
        match self {
            Change::Created { metadata, .. } | Change::Modified { metadata, .. } => Some(metadata),
            Change::Deleted { .. } => None,
        }
    }
}

/// A change tagged with the wall-clock time it was detected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub detected_at: DateTime<Local>,
    pub change: Change,
}

impl ChangeEvent {
    pub fn new(detected_at: DateTime<Local>, change: Change) -> Self {
        Self { detected_at, change }
    }

    pub fn name(&self) -> &str {
        self.change.name()
    }

    pub fn kind(&self) -> ChangeKind {
        self.change.kind()
    }
}
