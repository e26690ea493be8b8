//! Scan input: roots, match criteria and filter options.
//!
//! A [`SearchConfig`] is built by the caller (the CLI in this crate) and is
//! read-only for the duration of a scan.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default threshold below which a file counts as small.
pub const DEFAULT_SMALL_FILE_THRESHOLD: u64 = 1024;

/// A single match criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchCriterion {
    /// Files match when their names are equal
    Name,
    /// Files match when their sizes are equal
    Size,
}

/// The set of criteria that must all agree for two files to be duplicates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchMode {
    /// Compare file names
    pub by_name: bool,
    /// Compare file sizes
    pub by_size: bool,
}

impl MatchMode {
    /// Match by name only.
    pub const NAME: Self = Self {
        by_name: true,
        by_size: false,
    };
    /// Match by size only.
    pub const SIZE: Self = Self {
        by_name: false,
        by_size: true,
    };
    /// Match by name and size together.
    pub const NAME_AND_SIZE: Self = Self {
        by_name: true,
        by_size: true,
    };

    /// Build a mode from a list of criteria. Duplicates in the list are harmless.
    #[must_use]
    pub fn from_criteria(criteria: &[MatchCriterion]) -> Self {
        Self {
            by_name: criteria.contains(&MatchCriterion::Name),
            by_size: criteria.contains(&MatchCriterion::Size),
        }
    }

    /// True when no criterion is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.by_name && !self.by_size
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.by_name, self.by_size) {
            (true, true) => write!(f, "name+size"),
            (true, false) => write!(f, "name"),
            (false, true) => write!(f, "size"),
            (false, false) => write!(f, "none"),
        }
    }
}

/// Filter options. The declaration order is the evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOption {
    /// Skip zero-byte files
    IgnoreEmptyFile,
    /// Skip hidden files
    IgnoreHiddenFile,
    /// Skip files under the small-file threshold
    IgnoreSmallFile,
    /// Skip files with a system extension
    IgnoreSystemFile,
    /// Keep only document extensions
    OnlyDocumentFile,
    /// Keep only image extensions
    OnlyImageFile,
    /// Keep only audio/video extensions
    OnlyMediaFile,
    /// Keep only the listed file names
    OnlyFileName,
}

impl SearchOption {
    /// Every option, in evaluation order.
    pub const ALL: [Self; 8] = [
        Self::IgnoreEmptyFile,
        Self::IgnoreHiddenFile,
        Self::IgnoreSmallFile,
        Self::IgnoreSystemFile,
        Self::OnlyDocumentFile,
        Self::OnlyImageFile,
        Self::OnlyMediaFile,
        Self::OnlyFileName,
    ];
}

/// How file names compare when they are part of the match key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCase {
    /// `a.txt` and `A.TXT` are different names
    #[default]
    Sensitive,
    /// `a.txt` and `A.TXT` are the same name
    Insensitive,
}

/// Extension lists used by the extension filters.
///
/// Entries may be written with or without the leading dot and in any case;
/// the filter chain normalizes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionLists {
    /// Extensions skipped by `IgnoreSystemFile`
    pub system: Vec<String>,
    /// Extensions kept by `OnlyDocumentFile`
    pub document: Vec<String>,
    /// Extensions kept by `OnlyImageFile`
    pub image: Vec<String>,
    /// Extensions kept by `OnlyMediaFile`
    pub media: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

impl Default for ExtensionLists {
    fn default() -> Self {
        Self {
            system: owned(&[
                ".sys", ".dll", ".exe", ".ini", ".lnk", ".tmp", ".log", ".dat", ".bak", ".msi",
                ".cab", ".inf", ".drv", ".cpl", ".ocx",
            ]),
            document: owned(&[
                ".txt", ".doc", ".docx", ".pdf", ".xls", ".xlsx", ".ppt", ".pptx", ".odt",
                ".ods", ".odp", ".rtf", ".md", ".csv", ".wps",
            ]),
            image: owned(&[
                ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tif", ".tiff", ".webp", ".svg",
                ".ico", ".heic", ".psd", ".raw",
            ]),
            media: owned(&[
                ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".mp4", ".mkv", ".avi",
                ".mov", ".wmv", ".flv", ".webm", ".m4v", ".rmvb",
            ]),
        }
    }
}

/// Everything a scan needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Directories to walk, in order
    pub roots: Vec<PathBuf>,
    /// Match criteria (must not be empty)
    pub match_mode: MatchMode,
    /// Active filter options
    pub options: BTreeSet<SearchOption>,
    /// Extension lists for the extension filters
    pub extensions: ExtensionLists,
    /// Names kept by `OnlyFileName`
    pub only_file_names: BTreeSet<String>,
    /// Threshold used by `IgnoreSmallFile`
    pub small_file_threshold: u64,
    /// Name comparison policy
    pub name_case: NameCase,
    /// Follow symbolic links while walking
    pub follow_symlinks: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            match_mode: MatchMode::NAME,
            options: BTreeSet::new(),
            extensions: ExtensionLists::default(),
            only_file_names: BTreeSet::new(),
            small_file_threshold: DEFAULT_SMALL_FILE_THRESHOLD,
            name_case: NameCase::Sensitive,
            follow_symlinks: false,
        }
    }
}

impl SearchConfig {
    /// Create a config for the given roots and match mode with no filters.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, match_mode: MatchMode) -> Self {
        Self {
            roots,
            match_mode,
            ..Default::default()
        }
    }

    /// Enable a filter option.
    #[must_use]
    pub fn with_option(mut self, option: SearchOption) -> Self {
        self.options.insert(option);
        self
    }

    /// Restrict matching to the given names and enable `OnlyFileName`.
    #[must_use]
    pub fn with_only_file_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only_file_names = names.into_iter().map(Into::into).collect();
        self.options.insert(SearchOption::OnlyFileName);
        self
    }

    /// Set the name comparison policy.
    #[must_use]
    pub fn with_name_case(mut self, case: NameCase) -> Self {
        self.name_case = case;
        self
    }

    /// Whether an option is active.
    #[must_use]
    pub fn has_option(&self, option: SearchOption) -> bool {
        self.options.contains(&option)
    }

    /// Check the config can start a scan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when there is nothing to walk or nothing to match on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.roots.is_empty() {
            return Err(ConfigError::NoRoots);
        }
        if self.match_mode.is_empty() {
            return Err(ConfigError::NoMatchMode);
        }
        Ok(())
    }
}

/// Invalid scan configuration. Reported before any scan starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No directory was selected.
    #[error("No directories selected to search")]
    NoRoots,

    /// Neither name nor size matching was selected.
    #[error("No match criterion selected (choose name, size or both)")]
    NoMatchMode,
}
