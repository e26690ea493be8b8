//! Rendering of scan results.
//!
//! - [`text`]: human-readable lines, streamed while the scan runs
//! - [`json`]: one JSON document after the scan, for scripting
//! - [`csv`]: one row per duplicate file, for spreadsheets
//!
//! The core never formats sizes or times; everything display-related
//! happens here.

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;

use std::time::SystemTime;

use chrono::{DateTime, Utc};

/// RFC 3339 rendering of a modification time.
pub(crate) fn format_modified(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339()
}
