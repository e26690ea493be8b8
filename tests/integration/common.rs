//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use dupefind::duplicates::MatchKey;
use dupefind::events::{ScanEvent, ScanListener};
use dupefind::job::{ScanJob, ScanOutcome, ScanSummary};
use dupefind::scanner::FileRecord;
use dupefind::search::SearchConfig;

/// Write `len` bytes to `path`, creating parent directories.
pub fn write_file(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, vec![b'x'; len]).unwrap();
}

/// Run a scan to completion and collect its events.
pub fn run_scan(config: SearchConfig) -> (ScanOutcome, Vec<ScanEvent>) {
    let (tx, rx) = mpsc::channel();
    let mut job = ScanJob::new();
    job.start(config, Arc::new(tx)).unwrap();
    let outcome = job.wait().unwrap();
    (outcome, rx.try_iter().collect())
}

/// Paths of the `DuplicateFound` events, in emission order.
pub fn found_paths(events: &[ScanEvent]) -> Vec<PathBuf> {
    events
        .iter()
        .filter_map(|event| match event {
            ScanEvent::DuplicateFound { record, .. } => Some(record.path.clone()),
            _ => None,
        })
        .collect()
}

/// Listener that parks the worker on one status until released.
pub struct Gate {
    events: Sender<ScanEvent>,
    park_at: usize,
    statuses: AtomicUsize,
    reached: Mutex<Option<Sender<()>>>,
    release: Mutex<Receiver<()>>,
}

/// Test side of a [`Gate`].
pub struct GateControl {
    pub events: Receiver<ScanEvent>,
    pub reached: Receiver<()>,
    pub release: Sender<()>,
}

impl Gate {
    /// Park on the first status.
    pub fn new() -> (Arc<Self>, GateControl) {
        Self::parked_at(1)
    }

    /// Park on the `nth` status, counting from 1.
    pub fn parked_at(nth: usize) -> (Arc<Self>, GateControl) {
        let (events, events_rx) = mpsc::channel();
        let (reached_tx, reached_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gate = Arc::new(Self {
            events,
            park_at: nth,
            statuses: AtomicUsize::new(0),
            reached: Mutex::new(Some(reached_tx)),
            release: Mutex::new(release_rx),
        });
        let control = GateControl {
            events: events_rx,
            reached: reached_rx,
            release: release_tx,
        };
        (gate, control)
    }
}

impl ScanListener for Gate {
    fn on_status(&self, message: &str) {
        self.events.on_status(message);
        if self.statuses.fetch_add(1, Ordering::SeqCst) + 1 != self.park_at {
            return;
        }
        if let Some(reached) = self.reached.lock().unwrap().take() {
            reached.send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
    }

    fn on_duplicate_found(&self, key: &MatchKey, record: &FileRecord) {
        self.events.on_duplicate_found(key, record);
    }

    fn on_finished(&self, summary: &ScanSummary) {
        self.events.on_finished(summary);
    }

    fn on_stopped(&self, summary: &ScanSummary) {
        self.events.on_stopped(summary);
    }
}
