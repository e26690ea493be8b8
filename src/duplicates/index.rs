//! Streaming duplicate index.
//!
//! # Overview
//!
//! The [`DuplicateIndex`] classifies records one at a time. Each call to
//! [`DuplicateIndex::ingest`] reports what the new record changed:
//!
//! | Group size before | Result                                     |
//! |-------------------|--------------------------------------------|
//! | none              | [`Ingested::Singleton`], nothing to report |
//! | 1                 | [`Ingested::Discovered`]: first + new      |
//! | 2 or more         | [`Ingested::Member`]: new                  |
//!
//! Every record is therefore reported at most once, and a key's first
//! record is reported exactly when its second one arrives.
//!
//! The index has a single writer; it is owned by the scan worker.
//!
//! # Example
//!
//! ```
//! use dupefind::duplicates::{DuplicateIndex, Ingested};
//! use dupefind::scanner::FileRecord;
//! use dupefind::search::{MatchMode, NameCase};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let mut index = DuplicateIndex::new(MatchMode::NAME, NameCase::Sensitive).unwrap();
//! let a = FileRecord::new(PathBuf::from("/x/a.txt"), 10, SystemTime::now());
//! let b = FileRecord::new(PathBuf::from("/y/a.txt"), 20, SystemTime::now());
//!
//! assert!(matches!(index.ingest(a).unwrap(), Ingested::Singleton));
//! assert!(matches!(index.ingest(b).unwrap(), Ingested::Discovered { .. }));
//! ```

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use thiserror::Error;

use super::groups::DuplicateGroup;
use super::key::MatchKey;
use crate::scanner::FileRecord;
use crate::search::{MatchMode, NameCase};

/// Errors raised by the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Neither name nor size matching is enabled.
    #[error("Match mode is empty; select name, size or both")]
    EmptyMatchMode,

    /// The index was closed and accepts no more records.
    #[error("Duplicate index is closed")]
    Closed,
}

/// What ingesting one record changed.
#[derive(Debug, PartialEq, Eq)]
pub enum Ingested<'a> {
    /// First record with this key; not a duplicate yet.
    Singleton,
    /// The key just became a duplicate. Report `first`, then `record`.
    Discovered {
        /// Shared key
        key: &'a MatchKey,
        /// The record that was alone until now
        first: &'a FileRecord,
        /// The record that was just ingested
        record: &'a FileRecord,
    },
    /// Another member joined an existing duplicate group.
    Member {
        /// Shared key
        key: &'a MatchKey,
        /// The record that was just ingested
        record: &'a FileRecord,
    },
    /// A record with the same path was ingested before; ignored.
    AlreadySeen,
}

impl Ingested<'_> {
    /// The `(key, record)` notifications this result produces, in order.
    #[must_use]
    pub fn notifications(&self) -> Vec<(&MatchKey, &FileRecord)> {
        match *self {
            Self::Discovered { key, first, record } => vec![(key, first), (key, record)],
            Self::Member { key, record } => vec![(key, record)],
            Self::Singleton | Self::AlreadySeen => Vec::new(),
        }
    }
}

/// Counters kept by the index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Records accepted (excluding repeated paths)
    pub ingested: usize,
    /// Records ignored because their path was already present
    pub repeated_paths: usize,
    /// Distinct keys seen
    pub keys: usize,
    /// Keys with two or more records
    pub duplicate_groups: usize,
    /// Records belonging to duplicate groups
    pub duplicate_files: usize,
}

/// Key → group index with incremental duplicate reporting.
#[derive(Debug)]
pub struct DuplicateIndex {
    mode: MatchMode,
    name_case: NameCase,
    groups: HashMap<MatchKey, DuplicateGroup>,
    /// Keys in the order they became duplicates
    discovered: Vec<MatchKey>,
    paths: HashSet<PathBuf>,
    stats: IndexStats,
    closed: bool,
}

impl DuplicateIndex {
    /// Create an index for the given match mode.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::EmptyMatchMode`] when `mode` selects nothing.
    pub fn new(mode: MatchMode, name_case: NameCase) -> Result<Self, IndexError> {
        if mode.is_empty() {
            return Err(IndexError::EmptyMatchMode);
        }
        Ok(Self {
            mode,
            name_case,
            groups: HashMap::new(),
            discovered: Vec::new(),
            paths: HashSet::new(),
            stats: IndexStats::default(),
            closed: false,
        })
    }

    /// Classify one record.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Closed`] after [`close`](Self::close).
    pub fn ingest(&mut self, record: FileRecord) -> Result<Ingested<'_>, IndexError> {
        if self.closed {
            return Err(IndexError::Closed);
        }

        if !self.paths.insert(record.path.clone()) {
            log::debug!("Ignoring repeated path: {}", record.path.display());
            self.stats.repeated_paths += 1;
            return Ok(Ingested::AlreadySeen);
        }

        let key =
            MatchKey::of(&record, self.mode, self.name_case).ok_or(IndexError::EmptyMatchMode)?;
        self.stats.ingested += 1;

        match self.groups.entry(key) {
            Entry::Vacant(slot) => {
                let key = slot.key().clone();
                slot.insert(DuplicateGroup::new(key, record));
                self.stats.keys += 1;
                Ok(Ingested::Singleton)
            }
            Entry::Occupied(slot) => {
                let group = slot.into_mut();
                group.push(record);

                let group: &DuplicateGroup = group;
                let newest = group.len() - 1;
                if group.len() == 2 {
                    log::trace!("Duplicate key discovered: {}", group.key);
                    self.discovered.push(group.key.clone());
                    self.stats.duplicate_groups += 1;
                    self.stats.duplicate_files += 2;
                    Ok(Ingested::Discovered {
                        key: &group.key,
                        first: &group.members[0],
                        record: &group.members[newest],
                    })
                } else {
                    self.stats.duplicate_files += 1;
                    Ok(Ingested::Member {
                        key: &group.key,
                        record: &group.members[newest],
                    })
                }
            }
        }
    }

    /// Mark the index closed. Further ingests fail.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Match mode the index keys by.
    #[must_use]
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> IndexStats {
        self.stats
    }

    /// The group for `key`, singleton or not.
    #[must_use]
    pub fn group(&self, key: &MatchKey) -> Option<&DuplicateGroup> {
        self.groups.get(key)
    }

    /// Duplicate groups in the order their keys became duplicates.
    pub fn groups(&self) -> impl Iterator<Item = &DuplicateGroup> + '_ {
        self.discovered.iter().filter_map(|key| self.groups.get(key))
    }

    /// Consume the index, returning duplicate groups in discovery order.
    #[must_use]
    pub fn into_groups(mut self) -> Vec<DuplicateGroup> {
        self.discovered
            .iter()
            .filter_map(|key| self.groups.remove(key))
            .collect()
    }
}
