//! Background scan orchestration.
//!
//! A [`ScanJob`] runs the walker, the filter chain and the duplicate index
//! on one named background thread and reports to a [`ScanListener`].
//!
//! # State machine
//!
//! ```text
//! Idle ──start──▶ Running ──walk done──▶ Completed
//!                    │
//!                    └──stop, walk returns──▶ Stopped
//! ```
//!
//! `start` may be called again from `Completed` or `Stopped`. Every scan
//! builds its own filter chain, index and cancellation flag, so nothing
//! carries over between scans.
//!
//! # Example
//!
//! ```no_run
//! use dupefind::events::ScanEvent;
//! use dupefind::job::ScanJob;
//! use dupefind::search::{MatchMode, SearchConfig};
//! use std::path::PathBuf;
//! use std::sync::{mpsc, Arc};
//!
//! let (tx, rx) = mpsc::channel();
//! let mut job = ScanJob::new();
//! job.start(SearchConfig::new(vec![PathBuf::from(".")], MatchMode::NAME), Arc::new(tx))
//!     .unwrap();
//!
//! for event in rx {
//!     if let ScanEvent::DuplicateFound { key, record } = &event {
//!         println!("{key}: {}", record.path.display());
//!     }
//!     if event.is_terminal() {
//!         break;
//!     }
//! }
//! let outcome = job.wait().unwrap();
//! println!("{} groups", outcome.groups.len());
//! ```

use std::fmt::{self, Write as _};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::{DuplicateGroup, DuplicateIndex, IndexError};
use crate::events::ScanListener;
use crate::filters::FilterChain;
use crate::scanner::{DirBatch, ScanError, Walker, WalkerConfig};
use crate::search::{ConfigError, SearchConfig};

/// Names listed in a "Reading files" status before the rest are counted.
const STATUS_NAME_LIMIT: usize = 5;

/// Lifecycle state of a [`ScanJob`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    /// No scan started yet
    #[default]
    Idle,
    /// Worker thread is walking
    Running,
    /// Walk covered every root
    Completed,
    /// Walk ended early after `stop`
    Stopped,
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Counters describing one finished or stopped scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    /// Directories whose files were read
    pub directories: usize,
    /// Files read from those directories
    pub files_seen: usize,
    /// Files that passed the filter chain
    pub files_accepted: usize,
    /// Keys shared by two or more files
    pub duplicate_groups: usize,
    /// Files belonging to duplicate groups
    pub duplicate_files: usize,
    /// Directories that could not be listed
    pub skipped_directories: usize,
    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
    /// Whether the scan was stopped before completing
    pub interrupted: bool,
}

impl ScanSummary {
    /// Wall-clock duration of the scan.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    /// Whether any directory had to be skipped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.skipped_directories > 0
    }
}

/// Everything a scan produced, returned by [`ScanJob::wait`].
#[derive(Debug)]
pub struct ScanOutcome {
    /// Terminal state, `Completed` or `Stopped`
    pub state: ScanState,
    /// Counters
    pub summary: ScanSummary,
    /// Duplicate groups in discovery order
    pub groups: Vec<DuplicateGroup>,
    /// Directories that were skipped, with the reason
    pub errors: Vec<ScanError>,
}

/// Errors returned by [`ScanJob`] operations.
#[derive(Debug, Error)]
pub enum JobError {
    /// The configuration cannot start a scan.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The duplicate index rejected the configuration.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// A scan is running and was not asked to stop.
    #[error("A scan is already running")]
    AlreadyRunning,

    /// `wait` was called with no scan to wait for.
    #[error("No scan has been started")]
    NotStarted,

    /// The worker thread could not be created.
    #[error("Failed to spawn scan thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread panicked.
    #[error("Scan thread panicked")]
    WorkerPanicked,
}

/// Shared cancellation flag of one scan.
///
/// Obtained from [`ScanJob::stop_handle`]; stops only the scan that was
/// running when the handle was taken.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the scan to stop at its next directory.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop was requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs one scan at a time on a background thread.
#[derive(Debug, Default)]
pub struct ScanJob {
    state: Arc<Mutex<ScanState>>,
    cancel: Arc<AtomicBool>,
    worker: Option<JoinHandle<ScanOutcome>>,
}

impl ScanJob {
    /// Create an idle job.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config` and start scanning in the background.
    ///
    /// Returns as soon as the worker thread is spawned. If a previous scan
    /// was stopped but is still finishing its current directory, this waits
    /// for it first.
    ///
    /// # Errors
    ///
    /// - [`JobError::Config`] when `config` has no roots or no match criterion
    /// - [`JobError::AlreadyRunning`] when a scan is running and not stopping
    /// - [`JobError::Spawn`] when the thread cannot be created
    pub fn start(
        &mut self,
        config: SearchConfig,
        listener: Arc<dyn ScanListener>,
    ) -> Result<(), JobError> {
        config.validate()?;

        if self.is_running() && !self.cancel.load(Ordering::SeqCst) {
            return Err(JobError::AlreadyRunning);
        }
        if let Some(previous) = self.worker.take() {
            log::debug!("Waiting for previous scan to finish");
            if previous.join().is_err() {
                log::warn!("Previous scan thread panicked");
            }
        }

        let chain = FilterChain::from_config(&config);
        let index = DuplicateIndex::new(config.match_mode, config.name_case)?;
        self.cancel = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            config,
            chain,
            index,
            cancel: Arc::clone(&self.cancel),
            state: Arc::clone(&self.state),
            listener,
        };

        self.set_state(ScanState::Running);
        match thread::Builder::new()
            .name("dupefind-scan".to_string())
            .spawn(move || worker.run())
        {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.set_state(ScanState::Idle);
                Err(JobError::Spawn(err))
            }
        }
    }

    /// Ask the running scan to stop. It ends after the directory in progress.
    pub fn stop(&self) {
        if self.is_running() {
            log::info!("Stop requested");
        }
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Handle that stops the current scan from elsewhere.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.cancel))
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the worker is still walking.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == ScanState::Running
    }

    /// Block until the current scan ends and return what it produced.
    ///
    /// # Errors
    ///
    /// [`JobError::NotStarted`] when there is no scan to wait for,
    /// [`JobError::WorkerPanicked`] when the worker died.
    pub fn wait(&mut self) -> Result<ScanOutcome, JobError> {
        let handle = self.worker.take().ok_or(JobError::NotStarted)?;
        handle.join().map_err(|_| {
            self.set_state(ScanState::Stopped);
            JobError::WorkerPanicked
        })
    }

    fn set_state(&self, state: ScanState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl Drop for ScanJob {
    fn drop(&mut self) {
        if let Some(handle) = self.worker.take() {
            self.cancel.store(true, Ordering::SeqCst);
            if handle.join().is_err() {
                log::warn!("Scan thread panicked");
            }
        }
    }
}

/// State moved onto the worker thread.
struct Worker {
    config: SearchConfig,
    chain: FilterChain,
    index: DuplicateIndex,
    cancel: Arc<AtomicBool>,
    state: Arc<Mutex<ScanState>>,
    listener: Arc<dyn ScanListener>,
}

impl Worker {
    fn run(self) -> ScanOutcome {
        let Worker {
            config,
            chain,
            mut index,
            cancel,
            state,
            listener,
        } = self;

        let started = Instant::now();
        log::info!(
            "Scan started: {} root(s), matching by {}, {} filter(s)",
            config.roots.len(),
            config.match_mode,
            chain.len()
        );

        let walker =
            Walker::new(WalkerConfig::default().with_follow_symlinks(config.follow_symlinks));
        let mut accepted = 0usize;

        let walk = walker.walk_all(
            &config.roots,
            |batch| {
                if !batch.files.is_empty() {
                    listener.on_status(&reading_status(&batch));
                }
                let survivors = chain.apply(batch.files);
                accepted += survivors.len();

                for record in survivors {
                    match index.ingest(record) {
                        Ok(ingested) => {
                            for (key, record) in ingested.notifications() {
                                listener.on_duplicate_found(key, record);
                            }
                        }
                        Err(err) => log::error!("Failed to index record: {err}"),
                    }
                }
            },
            || cancel.load(Ordering::SeqCst),
        );

        for error in &walk.errors {
            listener.on_status(&format!("Skipped {}: {error}", error.path().display()));
        }

        index.close();
        let interrupted = cancel.load(Ordering::SeqCst);
        let stats = index.stats();
        let summary = ScanSummary {
            directories: walk.directories,
            files_seen: walk.files,
            files_accepted: accepted,
            duplicate_groups: stats.duplicate_groups,
            duplicate_files: stats.duplicate_files,
            skipped_directories: walk.errors.len(),
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            interrupted,
        };

        let terminal = if interrupted {
            ScanState::Stopped
        } else {
            ScanState::Completed
        };
        *state.lock().unwrap_or_else(PoisonError::into_inner) = terminal;

        log::info!(
            "Scan {terminal}: {} directories, {} files, {} duplicate group(s) in {:?}",
            summary.directories,
            summary.files_seen,
            summary.duplicate_groups,
            summary.elapsed()
        );

        if interrupted {
            listener.on_stopped(&summary);
        } else {
            listener.on_finished(&summary);
        }

        ScanOutcome {
            state: terminal,
            summary,
            groups: index.into_groups(),
            errors: walk.errors,
        }
    }
}

/// Status line announcing the files of one directory.
fn reading_status(batch: &DirBatch) -> String {
    let mut message = String::from("Reading files: ");
    for (i, file) in batch.files.iter().take(STATUS_NAME_LIMIT).enumerate() {
        if i > 0 {
            message.push_str(", ");
        }
        message.push_str(&file.name);
    }
    if batch.files.len() > STATUS_NAME_LIMIT {
        let _ = write!(message, " (+{} more)", batch.files.len() - STATUS_NAME_LIMIT);
    }
    message
}
