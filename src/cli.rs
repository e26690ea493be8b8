//! Command-line interface definitions for dupefind.
//!
//! Global options (verbosity, color, config file) come first, then a
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Find files sharing a name under two folders
//! dupefind scan ~/Music /mnt/backup/Music
//!
//! # Match by name and size, documents only, as JSON
//! dupefind scan ~/Documents --match name --match size --only-documents --output json
//!
//! # Size-only matching without the configured default filters
//! dupefind scan ~/Downloads --match size --no-default-options
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::search::{MatchCriterion, MatchMode, NameCase, SearchConfig, SearchOption};

/// Find duplicate files by name and/or size.
///
/// dupefind walks the given folders, filters files by the selected options
/// and reports every group of files that share a name, a size, or both.
#[derive(Debug, Parser)]
#[command(name = "dupefind")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file to use instead of the default one
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan folders for duplicate files
    Scan(ScanArgs),
    /// Print the default configuration file path
    ConfigPath,
    /// Write a configuration file holding the defaults
    InitConfig(InitConfigArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Folders to search (repeated folders are scanned once)
    #[arg(value_name = "PATH", required = true)]
    pub roots: Vec<PathBuf>,

    /// Match criterion; give twice to require both name and size
    ///
    /// Defaults to the configured `default_match` (name).
    #[arg(short, long = "match", value_enum, value_name = "CRITERION")]
    pub match_criteria: Vec<MatchArg>,

    /// Skip empty files
    #[arg(long)]
    pub ignore_empty: bool,

    /// Skip hidden files
    #[arg(long)]
    pub ignore_hidden: bool,

    /// Skip files smaller than the small-file threshold
    #[arg(long)]
    pub ignore_small: bool,

    /// Skip files with a system extension (.dll, .sys, ...)
    #[arg(long)]
    pub ignore_system: bool,

    /// Keep only documents
    #[arg(long)]
    pub only_documents: bool,

    /// Keep only images
    #[arg(long)]
    pub only_images: bool,

    /// Keep only audio and video files
    #[arg(long)]
    pub only_media: bool,

    /// Keep only files with this exact name (can be given multiple times)
    #[arg(long = "only-name", value_name = "NAME")]
    pub only_names: Vec<String>,

    /// Do not enable the configured default options
    #[arg(long)]
    pub no_default_options: bool,

    /// Compare names ignoring case
    #[arg(long)]
    pub case_insensitive: bool,

    /// Follow symbolic links during the scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Threshold for --ignore-small (e.g., 1KiB, 4KB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub small_threshold: Option<u64>,

    /// Output format (text streams duplicates as they are found)
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Plain progress output without animation
    #[arg(long)]
    pub accessible: bool,
}

impl ScanArgs {
    /// Combine the flags with `config` into a scan configuration.
    ///
    /// Flags add to the configured default options unless
    /// `--no-default-options` is given.
    #[must_use]
    pub fn to_search_config(&self, config: &Config) -> SearchConfig {
        let match_mode = if self.match_criteria.is_empty() {
            MatchMode::from_criteria(&config.default_match)
        } else {
            let criteria: Vec<MatchCriterion> =
                self.match_criteria.iter().copied().map(Into::into).collect();
            MatchMode::from_criteria(&criteria)
        };

        let mut search = SearchConfig::new(dedupe_roots(&self.roots), match_mode);
        if !self.no_default_options {
            search.options.extend(config.default_options.iter().copied());
        }

        let flags = [
            (self.ignore_empty, SearchOption::IgnoreEmptyFile),
            (self.ignore_hidden, SearchOption::IgnoreHiddenFile),
            (self.ignore_small, SearchOption::IgnoreSmallFile),
            (self.ignore_system, SearchOption::IgnoreSystemFile),
            (self.only_documents, SearchOption::OnlyDocumentFile),
            (self.only_images, SearchOption::OnlyImageFile),
            (self.only_media, SearchOption::OnlyMediaFile),
        ];
        for (set, option) in flags {
            if set {
                search.options.insert(option);
            }
        }
        if !self.only_names.is_empty() {
            search = search.with_only_file_names(self.only_names.iter().cloned());
        } else if search.options.remove(&SearchOption::OnlyFileName) {
            log::warn!("Ignoring only-file-name: no names given, pass --only-name");
        }

        search.extensions = config.extensions.clone();
        search.small_file_threshold = self.small_threshold.unwrap_or(config.small_file_threshold);
        search.name_case = if self.case_insensitive {
            NameCase::Insensitive
        } else {
            config.name_case
        };
        search.follow_symlinks = self.follow_symlinks || config.follow_symlinks;
        search
    }
}

/// Arguments for the init-config subcommand.
#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Where to write the file (defaults to the platform config path)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Match criterion as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MatchArg {
    /// Same file name
    Name,
    /// Same size in bytes
    Size,
}

impl From<MatchArg> for MatchCriterion {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Name => Self::Name,
            MatchArg::Size => Self::Size,
        }
    }
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, streamed while scanning
    Text,
    /// JSON document for scripting
    Json,
    /// CSV rows for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Canonicalize roots where possible and drop repeats, keeping first-seen order.
///
/// Roots that cannot be canonicalized (e.g. missing) are kept as given; the
/// walker skips them.
#[must_use]
pub fn dedupe_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(roots.len());
    for root in roots {
        let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.clone());
        if seen.insert(resolved.clone()) {
            unique.push(resolved);
        } else {
            log::debug!("Ignoring repeated folder: {}", root.display());
        }
    }
    unique
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use dupefind::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// ```
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// a negative number, or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
