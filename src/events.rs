//! Notifications emitted by a running scan.
//!
//! A [`ScanListener`] receives every notification from the scan worker
//! thread. Implementations must be `Send + Sync` and should return quickly;
//! the walk does not proceed while a callback runs.
//!
//! For consumers living on another thread, `mpsc::Sender<ScanEvent>`
//! implements the trait and turns each callback into an owned [`ScanEvent`].

use std::sync::mpsc::Sender;

use crate::duplicates::MatchKey;
use crate::job::ScanSummary;
use crate::scanner::FileRecord;

/// Receiver of scan notifications.
///
/// Per scan, the callbacks arrive in this order: any number of
/// `on_status` and `on_duplicate_found` calls, then exactly one of
/// `on_finished` or `on_stopped`.
pub trait ScanListener: Send + Sync {
    /// Human-readable progress message.
    fn on_status(&self, message: &str);

    /// A record that shares its key with at least one other record.
    ///
    /// The first record of a key is reported right before the second one.
    fn on_duplicate_found(&self, key: &MatchKey, record: &FileRecord);

    /// The walk completed over every root.
    fn on_finished(&self, summary: &ScanSummary);

    /// The scan ended early because it was stopped.
    fn on_stopped(&self, summary: &ScanSummary);
}

/// Owned form of a listener callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// See [`ScanListener::on_status`]
    Status(String),
    /// See [`ScanListener::on_duplicate_found`]
    DuplicateFound {
        /// Shared key
        key: MatchKey,
        /// Reported record
        record: FileRecord,
    },
    /// See [`ScanListener::on_finished`]
    Finished(ScanSummary),
    /// See [`ScanListener::on_stopped`]
    Stopped(ScanSummary),
}

impl ScanEvent {
    /// Whether this is the last event of a scan.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Stopped(_))
    }
}

// A dropped receiver only means nobody is listening any more.
impl ScanListener for Sender<ScanEvent> {
    fn on_status(&self, message: &str) {
        let _ = self.send(ScanEvent::Status(message.to_string()));
    }

    fn on_duplicate_found(&self, key: &MatchKey, record: &FileRecord) {
        let _ = self.send(ScanEvent::DuplicateFound {
            key: key.clone(),
            record: record.clone(),
        });
    }

    fn on_finished(&self, summary: &ScanSummary) {
        let _ = self.send(ScanEvent::Finished(summary.clone()));
    }

    fn on_stopped(&self, summary: &ScanSummary) {
        let _ = self.send(ScanEvent::Stopped(summary.clone()));
    }
}
