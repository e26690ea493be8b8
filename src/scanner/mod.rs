//! Scanner module for directory traversal and file metadata snapshots.
//!
//! This module provides functionality for:
//! - Post-order, per-directory traversal with cooperative cancellation
//! - Symlink cycle protection
//! - Unicode file name normalization
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and batch production
//! - [`cycle`]: Visited-directory tracking
//! - [`names`]: NFC normalization of file names
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(WalkerConfig::default());
//! let stats = walker.walk(
//!     Path::new("."),
//!     |batch| {
//!         for file in &batch.files {
//!             println!("{}: {} bytes", file.path.display(), file.size_bytes);
//!         }
//!     },
//!     || false,
//! );
//! println!("Visited {} directories", stats.directories);
//! ```

pub mod cycle;
pub mod names;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

// Re-export main types
pub use walker::{DirBatch, WalkStats, Walker};

/// Immutable snapshot of one file's metadata.
///
/// `path` is the identity of a record: two records with the same path
/// describe the same filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Base file name including extension
    pub name: String,
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size_bytes: u64,
    /// Last modification time
    pub last_modified: SystemTime,
    /// Lower-cased extension including the leading dot, or empty
    pub extension: String,
    /// Whether the file is hidden on this platform
    pub hidden: bool,
}

impl FileRecord {
    /// Create a record from explicit values.
    ///
    /// `name`, `extension` and `hidden` are derived from the path the same
    /// way the walker derives them, so records built here compare equal to
    /// walked ones (apart from platform hidden attributes).
    #[must_use]
    pub fn new(path: PathBuf, size_bytes: u64, last_modified: SystemTime) -> Self {
        let name = file_name_of(&path);
        let extension = extension_of(&path);
        let hidden = name.starts_with('.');
        Self {
            name,
            path,
            size_bytes,
            last_modified,
            extension,
            hidden,
        }
    }

    /// Build a record from a path and the metadata read for it.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let mut record = Self::new(path, metadata.len(), modified);
        record.hidden = record.hidden || has_hidden_attribute(metadata);
        record
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links to files and directories.
    /// Cycles are detected and skipped.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Enable or disable symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Errors that can occur while reading a directory.
///
/// None of these end a scan; the walker records them and moves on.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when listing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The directory vanished while it was being listed.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised for `path`.
    #[must_use]
    pub fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }

    /// The directory this error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) => path,
            Self::Io { path, .. } => path,
        }
    }
}
