//! Visited-directory tracking for symlink cycle protection.
//!
//! # Overview
//!
//! When symbolic links are followed, a link pointing at one of its own
//! ancestors turns the directory tree into a graph with cycles. The walker
//! records the identity of every directory it enters and refuses to enter
//! the same directory twice during one root's walk.
//!
//! # Platform Support
//!
//! - **Unix**: identity is the (device_id, inode) pair from the metadata
//! - **Other**: identity is the canonicalized path
//!
//! # Example
//!
//! ```
//! use dupefind::scanner::cycle::VisitedDirs;
//! use std::path::Path;
//!
//! let mut visited = VisitedDirs::new();
//! let dir = std::env::temp_dir();
//! let metadata = std::fs::metadata(&dir).unwrap();
//!
//! assert!(visited.first_visit(&dir, &metadata));
//! assert!(!visited.first_visit(&dir, &metadata));
//! ```

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

/// Set of directory identities already entered.
///
/// Not thread-safe; the walker owns one per root.
#[derive(Debug, Default)]
pub struct VisitedDirs {
    seen: HashSet<DirKey>,
}

impl VisitedDirs {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }

    /// Record a directory, returning `true` the first time it is seen.
    ///
    /// Returns `true` as well when no identity can be derived, so an
    /// unidentifiable directory is never skipped.
    pub fn first_visit(&mut self, path: &Path, metadata: &Metadata) -> bool {
        match DirKey::new(path, metadata) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }

    /// Number of distinct directories recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no directory has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DirKey {
    #[cfg(unix)]
    Inode { dev: u64, ino: u64 },
    #[cfg(not(unix))]
    Canonical(PathBuf),
}

impl DirKey {
    #[cfg(unix)]
    fn new(_path: &Path, metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self::Inode {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn new(path: &Path, _metadata: &Metadata) -> Option<Self> {
        std::fs::canonicalize(path).ok().map(Self::Canonical)
    }
}
