//! Point-in-time view of a single directory level

use ahash::AHashMap;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

/// Modification time and size of one file, as seen by a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    /// Last modification time
    pub mtime: SystemTime,
    /// Size in bytes
    pub size: u64,
}

impl FileStamp {
    pub fn new(mtime: SystemTime, size: u64) -> Self {
        Self { mtime, size }
    }
}

/// Mapping from file name to its stamp for the regular files directly
/// inside one directory
///
/// Only one generation is ever kept around: the monitor swaps the previous
/// snapshot for the current one after every diff.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    entries: AHashMap<String, FileStamp>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self {
            entries: AHashMap::new(),
        }
    }

    /// Scan `dir` and record every regular file directly inside it
    ///
    /// - A missing directory is created and yields an empty snapshot.
    /// - Entries that vanish or cannot be stat'ed mid-scan are skipped, so
    ///   the result may be partial under concurrent mutation.
    /// - Symlinks are resolved; a link to a regular file counts as a file.
    /// - Fails only if the directory itself cannot be opened.
    pub fn capture(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            std::fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create watched directory {}", dir.display())
            })?;
            return Ok(Self::new());
        }

        let mut snapshot = Self::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e).with_context(|| {
                        format!("Failed to read directory {}", dir.display())
                    });
                }
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                debug!("Skipping non UTF-8 file name: {:?}", entry.file_name());
                continue;
            };

            // Entry may disappear between listing and stat
            let stamp = match entry.metadata() {
                Ok(meta) => match meta.modified() {
                    Ok(mtime) => FileStamp::new(mtime, meta.len()),
                    Err(e) => {
                        debug!("No mtime for {}: {}", name, e);
                        continue;
                    }
                },
                Err(e) => {
                    debug!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            snapshot.insert(name.to_string(), stamp);
        }

        Ok(snapshot)
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, name: impl Into<String>, stamp: FileStamp) -> Option<FileStamp> {
        self.entries.insert(name.into(), stamp)
    }

    /// Get the stamp recorded for `name`
    pub fn get(&self, name: &str) -> Option<&FileStamp> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterate over `(name, stamp)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileStamp)> {
        self.entries.iter().map(|(name, stamp)| (name.as_str(), stamp))
    }

    /// Get the number of files in the snapshot
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FileStamp)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (S, FileStamp)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (name, stamp) in iter {
            snapshot.insert(name, stamp);
        }
        snapshot
    }
}

/// Anything that can produce a fresh snapshot of the watched directory
///
/// The polling scanner is the only implementation shipped; tests plug in
/// scripted sources.
pub trait SnapshotSource: Send + 'static {
    fn snapshot(&self) -> Result<Snapshot>;
}

/// Polls a directory on disk
#[derive(Debug, Clone)]
pub struct DirScanner {
    root: PathBuf,
}

impl DirScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory being scanned
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl SnapshotSource for DirScanner {
    fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::capture(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    #[test]
    fn test_capture_lists_only_top_level_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("a.txt"), b"hello").unwrap();
        fs::write(root.join("b.log"), b"").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/deep.txt"), b"ignored").unwrap();

        let snapshot = Snapshot::capture(root).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("a.txt").unwrap().size, 5);
        assert_eq!(snapshot.get("b.log").unwrap().size, 0);
        assert!(!snapshot.contains("nested"));
        assert!(!snapshot.contains("deep.txt"));
    }

    #[test]
    fn test_capture_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("not/yet/here");

        let snapshot = Snapshot::capture(&missing).unwrap();

        assert!(snapshot.is_empty());
        assert!(missing.is_dir());
    }

    #[test]
    fn test_capture_records_mtime() {
        use filetime::{set_file_mtime, FileTime};

        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("pinned.txt");
        fs::write(&file, b"0123456789").unwrap();

        let pinned = UNIX_EPOCH + Duration::from_secs(1_000_000);
        set_file_mtime(&file, FileTime::from_system_time(pinned)).unwrap();

        let snapshot = Snapshot::capture(temp_dir.path()).unwrap();
        assert_eq!(
            snapshot.get("pinned.txt"),
            Some(&FileStamp::new(pinned, 10))
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_capture_follows_symlinks_and_skips_broken_ones() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("target.txt"), b"abc").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(root.join("gone.txt"), root.join("dangling.txt")).unwrap();

        let snapshot = Snapshot::capture(root).unwrap();

        assert!(snapshot.contains("target.txt"));
        assert_eq!(snapshot.get("link.txt").unwrap().size, 3);
        assert!(!snapshot.contains("dangling.txt"));
    }

    #[test]
    fn test_from_iter_and_replace() {
        let t = UNIX_EPOCH + Duration::from_secs(100);
        let mut snapshot: Snapshot = [("f.txt", FileStamp::new(t, 10))].into_iter().collect();

        let old = snapshot.insert("f.txt", FileStamp::new(t, 11));
        assert_eq!(old, Some(FileStamp::new(t, 10)));
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_dir_scanner_uses_root() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("x"), b"1").unwrap();

        let scanner = DirScanner::new(temp_dir.path());
        assert_eq!(scanner.root(), temp_dir.path());
        assert!(scanner.snapshot().unwrap().contains("x"));
    }
}
