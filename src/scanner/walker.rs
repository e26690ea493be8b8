//! Post-order directory walker producing one batch per directory.
//!
//! # Overview
//!
//! The [`Walker`] visits every directory reachable from a root depth-first.
//! A directory's subdirectories are all walked before the directory's own
//! files are handed to the batch callback, so the deepest directories are
//! reported first. Entries of one directory are read in file-name order,
//! which makes the batch order deterministic.
//!
//! # Features
//!
//! - Single-level listings via [`walkdir`] (sorted, error-annotated)
//! - Cancellation checked once per directory, before it is entered and
//!   again before its files are handed out
//! - Missing directories skipped silently, unreadable ones recorded
//! - Optional symlink following with cycle detection via [`VisitedDirs`]
//!
//! # Example
//!
//! ```no_run
//! use dupefind::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(WalkerConfig::default());
//! let mut total = 0;
//! walker.walk(Path::new("/home/user/Downloads"), |batch| total += batch.files.len(), || false);
//! println!("Found {} files", total);
//! ```

use std::fs;
use std::io::ErrorKind;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::cycle::VisitedDirs;
use super::{FileRecord, ScanError, WalkerConfig};

/// The files of one directory, handed out after its subdirectories.
#[derive(Debug, Clone)]
pub struct DirBatch {
    /// Directory the files were read from
    pub dir: PathBuf,
    /// Regular files directly inside `dir`, in name order
    pub files: Vec<FileRecord>,
}

/// Counters and recovered errors from a walk.
#[derive(Debug, Default)]
pub struct WalkStats {
    /// Directories whose batch was delivered
    pub directories: usize,
    /// Files delivered across all batches
    pub files: usize,
    /// Files skipped because their metadata could not be read
    pub skipped_files: usize,
    /// Directories skipped because they could not be listed
    pub errors: Vec<ScanError>,
    /// Whether the walk stopped early because cancellation was requested
    pub cancelled: bool,
}

impl WalkStats {
    fn absorb(&mut self, other: WalkStats) {
        self.directories += other.directories;
        self.files += other.files;
        self.skipped_files += other.skipped_files;
        self.errors.extend(other.errors);
        self.cancelled |= other.cancelled;
    }
}

/// Subdirectories and files read from one directory.
#[derive(Debug, Default)]
struct Listing {
    subdirs: Vec<PathBuf>,
    files: Vec<FileRecord>,
    skipped_files: usize,
}

/// Recursive, cancellable directory walker.
#[derive(Debug, Clone, Default)]
pub struct Walker {
    config: WalkerConfig,
}

impl Walker {
    /// Create a walker with the given configuration.
    #[must_use]
    pub fn new(config: WalkerConfig) -> Self {
        Self { config }
    }

    /// Walk one root.
    ///
    /// `on_batch` is invoked exactly once for every visited directory, after
    /// all of its subdirectories. `is_cancelled` is consulted before each
    /// directory is entered and before its batch is delivered; once it
    /// returns `true` the walk ends without touching further directories.
    pub fn walk<F, C>(&self, root: &Path, mut on_batch: F, is_cancelled: C) -> WalkStats
    where
        F: FnMut(DirBatch),
        C: Fn() -> bool,
    {
        let mut stats = WalkStats::default();
        let mut visited = VisitedDirs::new();
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

        if self
            .visit(&root, &mut visited, &mut stats, &mut on_batch, &is_cancelled)
            .is_break()
        {
            log::debug!("Walker: cancellation requested, stopping at {}", root.display());
            stats.cancelled = true;
        }
        stats
    }

    /// Walk several roots one after another, in the given order.
    ///
    /// Overlapping roots are not merged: a file under two roots is delivered twice.
    pub fn walk_all<F, C>(&self, roots: &[PathBuf], mut on_batch: F, is_cancelled: C) -> WalkStats
    where
        F: FnMut(DirBatch),
        C: Fn() -> bool,
    {
        let mut total = WalkStats::default();
        for root in roots {
            if is_cancelled() {
                total.cancelled = true;
                break;
            }
            let stats = self.walk(root, &mut on_batch, &is_cancelled);
            let cancelled = stats.cancelled;
            total.absorb(stats);
            if cancelled {
                break;
            }
        }
        total
    }

    fn visit<F, C>(
        &self,
        dir: &Path,
        visited: &mut VisitedDirs,
        stats: &mut WalkStats,
        on_batch: &mut F,
        is_cancelled: &C,
    ) -> ControlFlow<()>
    where
        F: FnMut(DirBatch),
        C: Fn() -> bool,
    {
        if is_cancelled() {
            return ControlFlow::Break(());
        }

        let metadata = match fs::metadata(dir) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Directory not found, skipping: {}", dir.display());
                return ControlFlow::Continue(());
            }
            Err(e) => {
                self.record_error(stats, dir, e);
                return ControlFlow::Continue(());
            }
        };

        if !metadata.is_dir() {
            log::debug!("Not a directory, skipping: {}", dir.display());
            return ControlFlow::Continue(());
        }

        if !visited.first_visit(dir, &metadata) {
            log::warn!("Directory cycle detected, skipping: {}", dir.display());
            return ControlFlow::Continue(());
        }

        let listing = match self.list(dir) {
            Ok(listing) => listing,
            Err(e) => {
                self.record_error(stats, dir, e);
                return ControlFlow::Continue(());
            }
        };

        for subdir in &listing.subdirs {
            self.visit(subdir, visited, stats, on_batch, is_cancelled)?;
        }

        if is_cancelled() {
            return ControlFlow::Break(());
        }

        stats.directories += 1;
        stats.files += listing.files.len();
        stats.skipped_files += listing.skipped_files;
        on_batch(DirBatch {
            dir: dir.to_path_buf(),
            files: listing.files,
        });
        ControlFlow::Continue(())
    }

    /// Read the direct children of `dir`.
    ///
    /// Fails only when the directory itself cannot be read. Children whose
    /// metadata cannot be read are counted and skipped.
    fn list(&self, dir: &Path) -> Result<Listing, std::io::Error> {
        let follow = self.config.follow_symlinks;
        let mut listing = Listing::default();

        let entries = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(follow)
            .sort_by_file_name();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory listing failed")));
                }
                Err(e) => {
                    log::debug!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    listing.skipped_files += 1;
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_symlink() {
                // Only reachable when links are not followed
                log::trace!("Skipping symlink: {}", entry.path().display());
                continue;
            }

            if file_type.is_dir() {
                listing.subdirs.push(entry.into_path());
                continue;
            }

            if !file_type.is_file() {
                log::trace!("Skipping special file: {}", entry.path().display());
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    listing
                        .files
                        .push(FileRecord::from_metadata(entry.into_path(), &metadata));
                }
                Err(e) => {
                    log::debug!(
                        "File metadata unavailable (may have been deleted): {}: {}",
                        entry.path().display(),
                        e
                    );
                    listing.skipped_files += 1;
                }
            }
        }

        Ok(listing)
    }

    fn record_error(&self, stats: &mut WalkStats, dir: &Path, error: std::io::Error) {
        if error.kind() == ErrorKind::NotFound {
            log::debug!("Directory vanished, skipping: {}", dir.display());
            return;
        }
        let error = ScanError::from_io(dir.to_path_buf(), error);
        log::warn!("{}", error);
        stats.errors.push(error);
    }
}
