//! Match keys: the identity two files must share to be duplicates.

use std::fmt;

use serde::Serialize;

use crate::scanner::names::normalize_name;
use crate::scanner::FileRecord;
use crate::search::{MatchMode, NameCase};

/// Composite identity computed from a [`FileRecord`] under a [`MatchMode`].
///
/// Sizes are compared as exact byte counts. Names are NFC-normalized and,
/// under [`NameCase::Insensitive`], lower-cased before comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchKey {
    /// Name-only matching
    Name {
        /// Normalized file name
        name: String,
    },
    /// Size-only matching
    Size {
        /// Size in bytes
        size: u64,
    },
    /// Name and size must both agree
    NameAndSize {
        /// Normalized file name
        name: String,
        /// Size in bytes
        size: u64,
    },
}

impl MatchKey {
    /// Compute the key of `record`.
    ///
    /// Returns `None` for an empty match mode.
    #[must_use]
    pub fn of(record: &FileRecord, mode: MatchMode, case: NameCase) -> Option<Self> {
        let name = || normalize_name(&record.name, case).into_owned();
        match (mode.by_name, mode.by_size) {
            (true, false) => Some(Self::Name { name: name() }),
            (false, true) => Some(Self::Size {
                size: record.size_bytes,
            }),
            (true, true) => Some(Self::NameAndSize {
                name: name(),
                size: record.size_bytes,
            }),
            (false, false) => None,
        }
    }

    /// The name component, if the key has one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name { name } | Self::NameAndSize { name, .. } => Some(name),
            Self::Size { .. } => None,
        }
    }

    /// The size component, if the key has one.
    #[must_use]
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::Size { size } | Self::NameAndSize { size, .. } => Some(*size),
            Self::Name { .. } => None,
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { name } => write!(f, "{name}"),
            Self::Size { size } => write!(f, "{size}"),
            Self::NameAndSize { name, size } => write!(f, "{name}|{size}"),
        }
    }
}
