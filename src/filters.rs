//! Composable file filters.
//!
//! # Overview
//!
//! A [`FilterChain`] holds the filters selected by a scan's options, in the
//! fixed order of [`SearchOption::ALL`]. A record survives the chain only
//! when every active filter accepts it. Filters are pure predicates over a
//! [`FileRecord`], so a chain can be shared between threads.
//!
//! # Example
//!
//! ```
//! use dupefind::filters::FilterChain;
//! use dupefind::scanner::FileRecord;
//! use dupefind::search::{MatchMode, SearchConfig, SearchOption};
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let config = SearchConfig::new(vec![PathBuf::from("/data")], MatchMode::NAME)
//!     .with_option(SearchOption::IgnoreEmptyFile);
//! let chain = FilterChain::from_config(&config);
//!
//! let empty = FileRecord::new(PathBuf::from("/data/empty.txt"), 0, SystemTime::now());
//! assert!(!chain.accepts(&empty));
//! ```

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::scanner::FileRecord;
use crate::search::{SearchConfig, SearchOption};

/// A side-effect free predicate over file records.
pub trait FileFilter: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Whether the record may proceed to matching.
    fn accepts(&self, record: &FileRecord) -> bool;
}

/// Rejects zero-byte files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreEmptyFile;

impl FileFilter for IgnoreEmptyFile {
    fn name(&self) -> &'static str {
        "ignore-empty"
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        record.size_bytes != 0
    }
}

/// Rejects hidden files.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreHiddenFile;

impl FileFilter for IgnoreHiddenFile {
    fn name(&self) -> &'static str {
        "ignore-hidden"
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        !record.hidden
    }
}

/// Rejects files smaller than a threshold.
#[derive(Debug, Clone, Copy)]
pub struct IgnoreSmallFile {
    threshold: u64,
}

impl IgnoreSmallFile {
    /// Create a filter rejecting files under `threshold` bytes.
    #[must_use]
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }
}

impl FileFilter for IgnoreSmallFile {
    fn name(&self) -> &'static str {
        "ignore-small"
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        record.size_bytes >= self.threshold
    }
}

/// Normalized set of extensions (`.ext`, lower case).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionSet(HashSet<String>);

impl ExtensionSet {
    /// Build a set from configuration entries.
    ///
    /// Entries are trimmed and lower-cased, a missing leading dot is added,
    /// and blank entries are dropped.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = entries
            .into_iter()
            .filter_map(|entry| {
                let entry = entry.as_ref().trim().to_lowercase();
                if entry.is_empty() || entry == "." {
                    None
                } else if entry.starts_with('.') {
                    Some(entry)
                } else {
                    Some(format!(".{entry}"))
                }
            })
            .collect();
        Self(set)
    }

    /// Whether `extension` (as stored on a [`FileRecord`]) is in the set.
    #[must_use]
    pub fn contains(&self, extension: &str) -> bool {
        !extension.is_empty() && self.0.contains(extension)
    }

    /// Number of extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rejects files whose extension is in a list.
#[derive(Debug, Clone)]
pub struct IgnoreExtension {
    label: &'static str,
    extensions: ExtensionSet,
}

impl IgnoreExtension {
    /// Create a rejecting extension filter.
    #[must_use]
    pub fn new(label: &'static str, extensions: ExtensionSet) -> Self {
        Self { label, extensions }
    }
}

impl FileFilter for IgnoreExtension {
    fn name(&self) -> &'static str {
        self.label
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        !self.extensions.contains(&record.extension)
    }
}

/// Keeps only files whose extension is in a list.
#[derive(Debug, Clone)]
pub struct OnlyExtension {
    label: &'static str,
    extensions: ExtensionSet,
}

impl OnlyExtension {
    /// Create a restricting extension filter.
    #[must_use]
    pub fn new(label: &'static str, extensions: ExtensionSet) -> Self {
        Self { label, extensions }
    }
}

impl FileFilter for OnlyExtension {
    fn name(&self) -> &'static str {
        self.label
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        self.extensions.contains(&record.extension)
    }
}

/// Keeps only files with one of the given names (exact comparison).
#[derive(Debug, Clone)]
pub struct OnlyFileName {
    names: BTreeSet<String>,
}

impl OnlyFileName {
    /// Create a name filter.
    #[must_use]
    pub fn new(names: BTreeSet<String>) -> Self {
        Self { names }
    }
}

impl FileFilter for OnlyFileName {
    fn name(&self) -> &'static str {
        "only-file-name"
    }

    fn accepts(&self, record: &FileRecord) -> bool {
        self.names.contains(&record.name)
    }
}

/// Ordered conjunction of the active filters.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn FileFilter>>,
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.filters.iter().map(|filter| filter.name()))
            .finish()
    }
}

impl FilterChain {
    /// A chain accepting everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the chain for a scan.
    ///
    /// Only options present in `config.options` contribute a filter, and
    /// filters are added in [`SearchOption::ALL`] order regardless of the
    /// order the options were selected in.
    #[must_use]
    pub fn from_config(config: &SearchConfig) -> Self {
        let mut chain = Self::new();
        for option in SearchOption::ALL {
            if !config.has_option(option) {
                continue;
            }
            let lists = &config.extensions;
            let filter: Box<dyn FileFilter> = match option {
                SearchOption::IgnoreEmptyFile => Box::new(IgnoreEmptyFile),
                SearchOption::IgnoreHiddenFile => Box::new(IgnoreHiddenFile),
                SearchOption::IgnoreSmallFile => {
                    Box::new(IgnoreSmallFile::new(config.small_file_threshold))
                }
                SearchOption::IgnoreSystemFile => Box::new(IgnoreExtension::new(
                    "ignore-system",
                    ExtensionSet::new(&lists.system),
                )),
                SearchOption::OnlyDocumentFile => Box::new(OnlyExtension::new(
                    "only-document",
                    ExtensionSet::new(&lists.document),
                )),
                SearchOption::OnlyImageFile => Box::new(OnlyExtension::new(
                    "only-image",
                    ExtensionSet::new(&lists.image),
                )),
                SearchOption::OnlyMediaFile => Box::new(OnlyExtension::new(
                    "only-media",
                    ExtensionSet::new(&lists.media),
                )),
                SearchOption::OnlyFileName => {
                    Box::new(OnlyFileName::new(config.only_file_names.clone()))
                }
            };
            chain.push(filter);
        }
        log::debug!("Filter chain: {:?}", chain);
        chain
    }

    /// Append a filter to the end of the chain.
    pub fn push(&mut self, filter: Box<dyn FileFilter>) {
        self.filters.push(filter);
    }

    /// Number of active filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the chain has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the active filters, in evaluation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Whether a record passes every filter.
    #[must_use]
    pub fn accepts(&self, record: &FileRecord) -> bool {
        self.filters.iter().all(|filter| {
            let ok = filter.accepts(record);
            if !ok {
                log::trace!("{} rejected {}", filter.name(), record.path.display());
            }
            ok
        })
    }

    /// Narrow a batch to the records passing every filter, keeping order.
    #[must_use]
    pub fn apply(&self, records: Vec<FileRecord>) -> Vec<FileRecord> {
        if self.filters.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.accepts(r)).collect()
    }
}
