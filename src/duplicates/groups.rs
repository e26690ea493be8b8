//! Duplicate groups.
//!
//! A [`DuplicateGroup`] collects the records sharing one [`MatchKey`], in
//! the order they were discovered. Groups only grow.
//!
//! # Example
//!
//! ```
//! use dupefind::duplicates::{DuplicateGroup, MatchKey};
//! use dupefind::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let key = MatchKey::Size { size: 1024 };
//! let mut group = DuplicateGroup::new(
//!     key,
//!     FileRecord::new(PathBuf::from("/a/file1.txt"), 1024, SystemTime::now()),
//! );
//! group.push(FileRecord::new(PathBuf::from("/b/file2.txt"), 1024, SystemTime::now()));
//!
//! assert!(group.is_duplicate());
//! assert_eq!(group.total_size(), 2048);
//! ```

use std::path::PathBuf;

use serde::Serialize;

use super::key::MatchKey;
use crate::scanner::FileRecord;

/// Records sharing one match key, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Key shared by every member
    pub key: MatchKey,
    /// Members in discovery order
    pub members: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Start a group with its first member.
    #[must_use]
    pub fn new(key: MatchKey, first: FileRecord) -> Self {
        Self {
            key,
            members: vec![first],
        }
    }

    /// Append a member.
    pub fn push(&mut self, record: FileRecord) {
        self.members.push(record);
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the group has no members. Never true for groups built by the index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether the group holds two or more files.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.members.len() > 1
    }

    /// Sum of member sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.members.iter().map(|f| f.size_bytes).sum()
    }

    /// Member paths in discovery order.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.members.iter().map(|f| f.path.clone()).collect()
    }
}
