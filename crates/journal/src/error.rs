//! Typed journal errors

use std::path::PathBuf;

/// Failures a caller may want to tell apart from plain I/O errors
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Row field count differs from the store's header
    #[error("row has {got} fields but {} expects {expected}", path.display())]
    ColumnMismatch {
        path: PathBuf,
        expected: usize,
        got: usize,
    },

    /// Existing file was written with a different header
    #[error("{} has header {found:?}, expected {expected:?}", path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },
}
