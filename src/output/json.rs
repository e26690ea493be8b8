//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "match_mode": "name",
//!   "state": "completed",
//!   "duplicates": [
//!     {
//!       "key": { "kind": "name", "name": "report.pdf" },
//!       "total_size": 2048,
//!       "files": [
//!         { "path": "/a/report.pdf", "size": 1024, "modified": "2024-05-01T10:00:00+00:00" },
//!         { "path": "/b/report.pdf", "size": 1024, "modified": "2024-05-02T09:30:00+00:00" }
//!       ]
//!     }
//!   ],
//!   "summary": {
//!     "directories": 12,
//!     "files_seen": 340,
//!     "files_accepted": 210,
//!     "duplicate_groups": 1,
//!     "duplicate_files": 2,
//!     "skipped_directories": 0,
//!     "elapsed_ms": 15,
//!     "interrupted": false,
//!     "exit_code": 0,
//!     "exit_code_name": "DF000"
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use super::format_modified;
use crate::duplicates::{DuplicateGroup, MatchKey};
use crate::error::ExitCode;
use crate::job::{ScanState, ScanSummary};
use crate::scanner::FileRecord;
use crate::search::MatchMode;

/// One file of a group.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Absolute path
    pub path: String,
    /// Size in bytes
    pub size: u64,
    /// Last modified time (RFC 3339)
    pub modified: String,
}

impl From<&FileRecord> for JsonFile {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            size: record.size_bytes,
            modified: format_modified(record.last_modified),
        }
    }
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Shared key
    pub key: MatchKey,
    /// Sum of member sizes in bytes
    pub total_size: u64,
    /// Members in discovery order
    pub files: Vec<JsonFile>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            key: group.key.clone(),
            total_size: group.total_size(),
            files: group.members.iter().map(JsonFile::from).collect(),
        }
    }
}

/// Summary statistics with the exit code of the run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Scan counters
    #[serde(flatten)]
    pub scan: ScanSummary,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DF000")
    pub exit_code_name: String,
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Match mode the scan used ("name", "size", "name+size")
    pub match_mode: String,
    /// Terminal state of the scan
    pub state: ScanState,
    /// Duplicate groups in discovery order
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document for a finished or stopped scan.
    ///
    /// # Example
    ///
    /// ```
    /// use dupefind::error::ExitCode;
    /// use dupefind::job::{ScanState, ScanSummary};
    /// use dupefind::output::json::JsonOutput;
    /// use dupefind::search::MatchMode;
    ///
    /// let output = JsonOutput::new(
    ///     MatchMode::NAME,
    ///     ScanState::Completed,
    ///     &[],
    ///     &ScanSummary::default(),
    ///     ExitCode::NoDuplicates,
    /// );
    /// assert!(output.duplicates.is_empty());
    /// ```
    #[must_use]
    pub fn new(
        mode: MatchMode,
        state: ScanState,
        groups: &[DuplicateGroup],
        summary: &ScanSummary,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            match_mode: mode.to_string(),
            state,
            duplicates: groups.iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary {
                scan: summary.clone(),
                exit_code: exit_code.as_i32(),
                exit_code_name: exit_code.code_prefix().to_string(),
            },
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
