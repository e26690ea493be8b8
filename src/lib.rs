//! dupefind - duplicate file finder
//!
//! Finds files that share a name, a size, or both across several folder
//! trees. The scan runs on a background thread and reports duplicates while
//! it walks, so results appear before the scan completes.
//!
//! # Pipeline
//!
//! 1. [`scanner::Walker`] walks each root post-order, one batch per directory
//! 2. [`filters::FilterChain`] drops files excluded by the search options
//! 3. [`duplicates::DuplicateIndex`] groups survivors by [`duplicates::MatchKey`]
//! 4. [`job::ScanJob`] drives the above and notifies an [`events::ScanListener`]

pub mod app;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod events;
pub mod filters;
pub mod job;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod search;
pub mod signal;

pub use app::run_app;
