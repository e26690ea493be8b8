//! Duplicate detection.
//!
//! This module provides:
//! - Match keys computed from file metadata ([`MatchKey`])
//! - Groups of records sharing a key ([`DuplicateGroup`])
//! - The streaming index that reports duplicates as they appear ([`DuplicateIndex`])

pub mod groups;
pub mod index;
pub mod key;

pub use groups::DuplicateGroup;
pub use index::{DuplicateIndex, IndexError, IndexStats, Ingested};
pub use key::MatchKey;
