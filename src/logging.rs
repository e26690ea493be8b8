//! Logging setup on the `log` facade with an `env_logger` backend.
//!
//! The level comes from, in priority order:
//!
//! 1. `RUST_LOG` (full `env_logger` filter syntax)
//! 2. `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Info
//!
//! Debug builds prefix records with a timestamp; with `-v` they also show
//! the module and, for records from the scan worker, the thread name.
//! Release builds print level and message only.
//!
//! ```rust,no_run
//! use dupefind::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible at -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Crate prefix stripped from module paths in log lines.
const CRATE_PREFIX: &str = "dupefind::";

/// Install the global logger.
///
/// Calling it again is harmless: the first logger stays installed, which
/// lets tests drive the application entry point repeatedly.
pub fn init_logging(verbose: u8, quiet: bool) {
    let from_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    if from_env {
        log::debug!("Log filter taken from RUST_LOG");
    } else {
        log::debug!("Log level: {}", determine_level(verbose, quiet));
    }
}

/// Level selected by the CLI flags. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Module path without the crate prefix (`scanner::walker`).
fn short_module(path: Option<&str>) -> &str {
    let path = path.unwrap_or("unknown");
    path.strip_prefix(CRATE_PREFIX).unwrap_or(path)
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let style = buf.default_level_style(level);

            if verbose == 0 {
                return writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args());
            }

            let module = short_module(record.module_path());
            match std::thread::current().name() {
                Some(thread) if thread != "main" => writeln!(
                    buf,
                    "{timestamp} {style}{level:<5}{style:#} [{module}@{thread}] {}",
                    record.args()
                ),
                _ => writeln!(
                    buf,
                    "{timestamp} {style}{level:<5}{style:#} [{module}] {}",
                    record.args()
                ),
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}
