//! Application entry point behind the binary.
//!
//! [`run_app`] dispatches the parsed command line. A scan runs on the
//! [`ScanJob`] worker while this thread drains its events, drives the
//! spinner, streams text output and turns Ctrl+C into [`ScanJob::stop`].

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::cli::{Cli, Commands, InitConfigArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::error::ExitCode;
use crate::events::ScanEvent;
use crate::job::{ScanJob, ScanOutcome};
use crate::logging::init_logging;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::StatusSpinner;
use crate::search::MatchMode;
use crate::signal::install_handler;

/// How long the event loop waits before re-checking for Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for invalid configuration, unreadable config files and
/// output failures. A stopped scan is not an error; it maps to
/// [`ExitCode::Interrupted`].
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    match &cli.command {
        Commands::Scan(args) => run_scan(args, cli.config.as_deref(), cli.quiet),
        Commands::ConfigPath => {
            println!("{}", Config::default_path()?.display());
            Ok(ExitCode::Success)
        }
        Commands::InitConfig(args) => init_config(args, cli.config.as_deref()),
    }
}

fn run_scan(args: &ScanArgs, config_path: Option<&Path>, quiet: bool) -> Result<ExitCode> {
    let config = Config::load(config_path)?;
    let search = args.to_search_config(&config);
    let mode = search.match_mode;

    for root in &search.roots {
        if !root.is_dir() {
            log::warn!("Not a directory, skipping: {}", root.display());
        }
    }

    let shutdown = install_handler()?;
    let spinner =
        StatusSpinner::with_accessible(quiet || args.output != OutputFormat::Text, args.accessible);
    let mut text = TextOutput::new();

    let (tx, rx) = mpsc::channel();
    let mut job = ScanJob::new();
    job.start(search, Arc::new(tx))
        .context("Failed to start scan")?;

    let mut stopping = false;
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(ScanEvent::Status(message)) => spinner.set_status(&message),
            Ok(ScanEvent::DuplicateFound { key, record }) => {
                spinner.inc_duplicates();
                if args.output == OutputFormat::Text {
                    spinner.println(&text.duplicate_line(&key, &record));
                }
            }
            Ok(ScanEvent::Finished(_) | ScanEvent::Stopped(_))
            | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if !stopping && shutdown.is_shutdown_requested() {
            stopping = true;
            spinner.set_status("Stopping...");
            job.stop();
        }
    }

    let outcome = job.wait()?;
    spinner.finish();

    let exit_code = ExitCode::for_summary(&outcome.summary);
    write_results(args.output, mode, &outcome, exit_code, &text, quiet)?;
    Ok(exit_code)
}

fn write_results(
    format: OutputFormat,
    mode: MatchMode,
    outcome: &ScanOutcome,
    exit_code: ExitCode,
    text: &TextOutput,
    quiet: bool,
) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Text => {
            if !quiet {
                for line in text.summary_lines(outcome.state, &outcome.summary) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        OutputFormat::Json => {
            JsonOutput::new(
                mode,
                outcome.state,
                &outcome.groups,
                &outcome.summary,
                exit_code,
            )
            .write_to(&mut out, true)?;
        }
        OutputFormat::Csv => CsvOutput::new(&outcome.groups).write_to(&mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn init_config(args: &InitConfigArgs, global: Option<&Path>) -> Result<ExitCode> {
    let path: PathBuf = match (&args.path, global) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => path.to_path_buf(),
        (None, None) => Config::default_path()?,
    };

    if path.exists() && !args.force {
        bail!(
            "Config file already exists: {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save(&path)?;
    log::info!("Wrote default configuration to {}", path.display());
    println!("{}", path.display());
    Ok(ExitCode::Success)
}
