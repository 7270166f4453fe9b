//! Append-only CSV log store
//!
//! Every append opens the file, writes exactly one row, flushes and closes
//! it again. No handle is held between rows, so a crash can never leave a
//! half-buffered writer behind. The cost is one open/close per row, which
//! is negligible at monitor tick rates.

use crate::error::JournalError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// A row type with a fixed column layout
pub trait LogRow {
    /// Header written once at the top of the store
    const COLUMNS: &'static [&'static str];

    /// Field values, in column order
    fn fields(&self) -> Vec<String>;
}

/// Append-only log file with a fixed header
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
    columns: &'static [&'static str],
}

impl LogStore {
    /// Open or create a store
    ///
    /// Creates parent directories, writes the header if the file is new and
    /// verifies the header of an existing file.
    pub fn open(path: impl Into<PathBuf>, columns: &'static [&'static str]) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }

        if !ensure_header(&path, columns)? {
            verify_header(&path, columns)?;
        }

        Ok(Self { path, columns })
    }

    /// Open or create a store laid out for `R`
    pub fn open_for<R: LogRow>(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(path, R::COLUMNS)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Append one raw row
    ///
    /// Rejects rows whose field count differs from the header.
    pub fn append_row<S: AsRef<str>>(&self, fields: &[S]) -> Result<()> {
        if fields.len() != self.columns.len() {
            return Err(JournalError::ColumnMismatch {
                path: self.path.clone(),
                expected: self.columns.len(),
                got: fields.len(),
            }
            .into());
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut writer = csv::Writer::from_writer(file);
        writer
            .write_record(fields.iter().map(|f| f.as_ref()))
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;

        Ok(())
    }

    /// Append one typed row
    pub fn append<R: LogRow>(&self, row: &R) -> Result<()> {
        self.append_row(&row.fields())
    }

    /// Read every data row back, skipping rows that fail to parse
    pub fn read<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        read_rows(&self.path)
    }

    /// Number of data rows (header excluded)
    pub fn row_count(&self) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;

        let mut count = 0;
        for record in reader.records() {
            record.with_context(|| format!("Failed to read {}", self.path.display()))?;
            count += 1;
        }
        Ok(count)
    }
}

/// Write the header row if the store is new (missing or empty)
///
/// Idempotent: returns `true` only on the call that wrote the header.
pub fn ensure_header(path: &Path, columns: &[&str]) -> Result<bool> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    if file.metadata()?.len() > 0 {
        return Ok(false);
    }

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(columns)?;
    writer.flush()?;

    debug!("Created log store {}", path.display());
    Ok(true)
}

fn verify_header(path: &Path, columns: &[&str]) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let found: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read header of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if found.iter().map(String::as_str).ne(columns.iter().copied()) {
        return Err(JournalError::HeaderMismatch {
            path: path.to_path_buf(),
            expected: columns.iter().map(|c| c.to_string()).collect(),
            found,
        }
        .into());
    }
    Ok(())
}

/// Read every data row of a store, keyed by header names
///
/// A missing file reads as empty. Rows that fail to parse are skipped.
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => debug!("Skipping row {} of {}: {}", line + 1, path.display(), e),
        }
    }
    Ok(rows)
}

/// What a monitor does when appending to its store fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    /// Log the failure, drop the row, keep monitoring
    #[default]
    Skip,
    /// Stop the affected monitor with the error
    Abort,
}

impl WritePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            WritePolicy::Skip => "skip",
            WritePolicy::Abort => "abort",
        }
    }

    /// Apply the policy to the outcome of an append
    pub fn apply(self, monitor: &str, result: Result<()>) -> Result<()> {
        match (self, result) {
            (_, Ok(())) => Ok(()),
            (WritePolicy::Skip, Err(e)) => {
                error!(monitor = %monitor, "Dropping log row: {:#}", e);
                Ok(())
            }
            (WritePolicy::Abort, Err(e)) => Err(e.context(format!("{} log write failed", monitor))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const COLUMNS: &[&str] = &["A", "B", "C"];

    fn lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_ensure_header_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");

        assert!(ensure_header(&path, COLUMNS).unwrap());
        assert!(!ensure_header(&path, COLUMNS).unwrap());

        assert_eq!(lines(&path), vec!["A,B,C"]);
    }

    #[test]
    fn test_open_twice_keeps_single_header_and_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs/nested/log.csv");

        let store = LogStore::open(&path, COLUMNS).unwrap();
        store.append_row(&["1", "2", "3"]).unwrap();
        drop(store);

        let store = LogStore::open(&path, COLUMNS).unwrap();
        store.append_row(&["4", "5", "6"]).unwrap();

        assert_eq!(lines(&path), vec!["A,B,C", "1,2,3", "4,5,6"]);
        assert_eq!(store.row_count().unwrap(), 2);
    }

    #[test]
    fn test_append_rejects_wrong_column_count() {
        let temp_dir = TempDir::new().unwrap();
        let store = LogStore::open(temp_dir.path().join("log.csv"), COLUMNS).unwrap();

        let err = store.append_row(&["only", "two"]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JournalError>(),
            Some(JournalError::ColumnMismatch { expected: 3, got: 2, .. })
        ));
        assert_eq!(store.row_count().unwrap(), 0);
    }

    #[test]
    fn test_fields_are_quoted() {
        let temp_dir = TempDir::new().unwrap();
        let store = LogStore::open(temp_dir.path().join("log.csv"), COLUMNS).unwrap();

        store.append_row(&["a,b", "say \"hi\"", "plain"]).unwrap();

        assert_eq!(lines(store.path())[1], r#""a,b","say ""hi""",plain"#);
    }

    #[test]
    fn test_rows_keep_append_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = LogStore::open(temp_dir.path().join("log.csv"), COLUMNS).unwrap();

        for i in 0..50 {
            let n = i.to_string();
            store.append_row(&[n.as_str(), "x", "y"]).unwrap();
        }

        let rows = lines(store.path());
        assert_eq!(rows.len(), 51);
        for (i, row) in rows.iter().skip(1).enumerate() {
            assert_eq!(row, &format!("{},x,y", i));
        }
    }

    #[test]
    fn test_open_rejects_foreign_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.csv");
        std::fs::write(&path, "X,Y\n1,2\n").unwrap();

        let err = LogStore::open(&path, COLUMNS).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JournalError>(),
            Some(JournalError::HeaderMismatch { .. })
        ));
    }

    #[test]
    fn test_read_rows_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let rows: Vec<(String, String)> = read_rows(&temp_dir.path().join("none.csv")).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_write_policy() {
        assert!(WritePolicy::Skip
            .apply("test", Err(anyhow::anyhow!("disk full")))
            .is_ok());
        assert!(WritePolicy::Abort
            .apply("test", Err(anyhow::anyhow!("disk full")))
            .is_err());
        assert!(WritePolicy::Abort.apply("test", Ok(())).is_ok());
        assert_eq!(WritePolicy::default().as_str(), "skip");
        assert_eq!(WritePolicy::Abort.as_str(), "abort");
    }
}
