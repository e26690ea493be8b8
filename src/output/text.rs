//! Human-readable output, streamed while the scan runs.
//!
//! Every reported duplicate becomes one line as soon as the scan finds it:
//!
//! ```text
//! report.pdf  /home/ana/docs/report.pdf  (1.2 MiB, 2024-05-01 10:00)
//! report.pdf  /mnt/backup/report.pdf  (1.2 MiB, 2024-04-11 08:12)
//! ```
//!
//! Lines of different keys may interleave, so each line starts with its key.
//! Colors come from `yansi` and are switched off globally by `--no-color`.

use bytesize::ByteSize;
use chrono::{DateTime, Local};
use yansi::Paint;

use crate::duplicates::MatchKey;
use crate::job::{ScanState, ScanSummary};
use crate::scanner::FileRecord;

/// Formatter for the text output mode.
#[derive(Debug, Default)]
pub struct TextOutput {
    reported: usize,
}

impl TextOutput {
    /// Create a formatter with nothing reported yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines produced by [`duplicate_line`](Self::duplicate_line).
    #[must_use]
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Line announcing one duplicate file.
    pub fn duplicate_line(&mut self, key: &MatchKey, record: &FileRecord) -> String {
        self.reported += 1;
        let modified: DateTime<Local> = record.last_modified.into();
        format!(
            "{}  {}  {}",
            key.to_string().bold().cyan(),
            record.path.display(),
            format!(
                "({}, {})",
                ByteSize::b(record.size_bytes),
                modified.format("%Y-%m-%d %H:%M")
            )
            .dim()
        )
    }

    /// Closing lines after the scan ended.
    #[must_use]
    pub fn summary_lines(&self, state: ScanState, summary: &ScanSummary) -> Vec<String> {
        let headline = match state {
            ScanState::Stopped => "Scan stopped".yellow().bold().to_string(),
            _ => "Scan complete".green().bold().to_string(),
        };

        let mut lines = vec![
            String::new(),
            headline,
            format!(
                "  {} directories, {} files read, {} matched the filters",
                summary.directories, summary.files_seen, summary.files_accepted
            ),
        ];

        if summary.duplicate_groups == 0 {
            lines.push("  No duplicates found".to_string());
        } else {
            lines.push(format!(
                "  {} duplicate files in {} groups",
                summary.duplicate_files.bold(),
                summary.duplicate_groups.bold()
            ));
        }
        if summary.has_errors() {
            lines.push(
                format!(
                    "  {} directories could not be read",
                    summary.skipped_directories
                )
                .red()
                .to_string(),
            );
        }
        lines.push(format!("  Took {:.2?}", summary.elapsed()).dim().to_string());
        lines
    }
}
