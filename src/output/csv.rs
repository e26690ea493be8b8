//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each duplicate file.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number, in discovery order
//! - `key`: the shared key (`name`, `size` or `name|size`)
//! - `name`: file name
//! - `path`: absolute path
//! - `size`: size in bytes
//! - `modified`: last modified time (RFC 3339)

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::format_modified;
use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    key: &'a str,
    name: &'a str,
    path: String,
    size: u64,
    modified: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the header and one row per duplicate file.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let key = group.key.to_string();
            for record in &group.members {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    key: &key,
                    name: &record.name,
                    path: record.path.to_string_lossy().into_owned(),
                    size: record.size_bytes,
                    modified: format_modified(record.last_modified),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
