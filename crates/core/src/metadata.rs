//! File metadata descriptors

use std::fmt;
use std::path::{Path, PathBuf};

/// Size and permission string of one file at lookup time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub size_bytes: u64,
    /// ls-style mode string, e.g. `-rw-r--r--`
    pub permissions: String,
}

/// Result of a metadata lookup
///
/// `Absent` means the file was gone (or unreadable) by the time it was
/// looked up. That is an expected race with the directory scan, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metadata {
    Present(Descriptor),
    Absent,
}

impl Metadata {
    /// Size in bytes, if the file was present
    pub fn size(&self) -> Option<u64> {
        match self {
            Metadata::Present(d) => Some(d.size_bytes),
            Metadata::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Metadata::Absent)
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metadata::Present(d) => write!(f, "Size:{}B | Perms:{}", d.size_bytes, d.permissions),
            Metadata::Absent => write!(f, "File Deleted"),
        }
    }
}

/// Look up the current size and permissions of `path`
///
/// Never fails: a missing file yields [`Metadata::Absent`]. Existence for
/// event classification always comes from snapshot membership, never from
/// this call.
pub fn describe(path: &Path) -> Metadata {
    match std::fs::metadata(path) {
        Ok(meta) => Metadata::Present(Descriptor {
            size_bytes: meta.len(),
            permissions: filemode(mode_bits(&meta)),
        }),
        Err(_) => Metadata::Absent,
    }
}

#[cfg(unix)]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::MetadataExt;
    meta.mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &std::fs::Metadata) -> u32 {
    let kind = if meta.is_dir() { S_IFDIR } else { S_IFREG };
    let perms = if meta.permissions().readonly() { 0o444 } else { 0o666 };
    kind | perms
}

const S_IFMT: u32 = 0o170000;
const S_IFSOCK: u32 = 0o140000;
const S_IFLNK: u32 = 0o120000;
#[cfg(not(unix))]
const S_IFREG: u32 = 0o100000;
const S_IFBLK: u32 = 0o060000;
const S_IFDIR: u32 = 0o040000;
const S_IFCHR: u32 = 0o020000;
const S_IFIFO: u32 = 0o010000;

const S_ISUID: u32 = 0o4000;
const S_ISGID: u32 = 0o2000;
const S_ISVTX: u32 = 0o1000;

/// Render raw mode bits as a 10-character string like `drwxr-sr-t`
pub fn filemode(mode: u32) -> String {
    let mut out = String::with_capacity(10);

    out.push(match mode & S_IFMT {
        S_IFSOCK => 's',
        S_IFLNK => 'l',
        S_IFBLK => 'b',
        S_IFDIR => 'd',
        S_IFCHR => 'c',
        S_IFIFO => 'p',
        _ => '-',
    });

    // (read, write, exec, special bit, special char when exec set)
    let triads = [
        (0o400, 0o200, 0o100, S_ISUID, 's'),
        (0o040, 0o020, 0o010, S_ISGID, 's'),
        (0o004, 0o002, 0o001, S_ISVTX, 't'),
    ];

    for (read, write, exec, special, special_char) in triads {
        out.push(if mode & read != 0 { 'r' } else { '-' });
        out.push(if mode & write != 0 { 'w' } else { '-' });
        out.push(match (mode & exec != 0, mode & special != 0) {
            (true, true) => special_char,
            (false, true) => special_char.to_ascii_uppercase(),
            (true, false) => 'x',
            (false, false) => '-',
        });
    }

    out
}

/// Resolves file names to metadata
///
/// Names are relative to the watched directory.
pub trait MetadataSource: Send + 'static {
    fn describe(&self, name: &str) -> Metadata;
}

/// Looks names up on disk under a fixed root
#[derive(Debug, Clone)]
pub struct DirMetadata {
    root: PathBuf,
}

impl DirMetadata {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl MetadataSource for DirMetadata {
    fn describe(&self, name: &str) -> Metadata {
        describe(&self.root.join(name))
    }
}
