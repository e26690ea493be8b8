//! Terminal spinner driven by scan status messages.
//!
//! [`StatusSpinner`] shows the latest status and a running count of
//! duplicates. Output printed while the spinner is visible must go through
//! [`StatusSpinner::println`] so lines are not torn by the redraw.
//!
//! # Accessible Mode
//!
//! With accessible mode the spinner has no animation and redraws rarely,
//! which keeps screen readers usable.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Longest status shown before the path part is shortened.
const MAX_STATUS_LEN: usize = 60;

/// Spinner showing the scan's current status.
#[derive(Debug)]
pub struct StatusSpinner {
    bar: ProgressBar,
    hidden: bool,
}

impl StatusSpinner {
    /// Create a spinner. With `hidden` nothing is ever drawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupefind::progress::StatusSpinner;
    ///
    /// let spinner = StatusSpinner::new(true);
    /// spinner.set_status("Reading files: a.txt");
    /// spinner.finish();
    /// ```
    #[must_use]
    pub fn new(hidden: bool) -> Self {
        Self::with_accessible(hidden, false)
    }

    /// Create a spinner, optionally in accessible mode.
    #[must_use]
    pub fn with_accessible(hidden: bool, accessible: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        bar.set_style(spinner_style(accessible));

        if !hidden {
            let tick_rate = if accessible { 500 } else { 100 };
            bar.enable_steady_tick(Duration::from_millis(tick_rate));
        }
        Self { bar, hidden }
    }

    /// Whether the spinner never draws.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Replace the status line.
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(shorten_status(status, MAX_STATUS_LEN));
    }

    /// Count one more duplicate file.
    pub fn inc_duplicates(&self) {
        self.bar.inc(1);
    }

    /// Print a line above the spinner.
    pub fn println(&self, line: &str) {
        if self.hidden {
            println!("{line}");
        } else {
            self.bar.println(line);
        }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn spinner_style(accessible: bool) -> ProgressStyle {
    if accessible {
        ProgressStyle::with_template("{msg} [{elapsed_precise}] {pos} duplicates")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    } else {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} duplicates")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }
}

/// Shorten a status to at most `max_len` characters, keeping its end.
///
/// Status lines end with the interesting part (file names, a path), so
/// the start is cut.
fn shorten_status(status: &str, max_len: usize) -> String {
    let count = status.chars().count();
    if count <= max_len {
        return status.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let tail: String = status.chars().skip(count - keep).collect();
    format!("...{tail}")
}
