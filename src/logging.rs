//! Logging configuration using the tracing ecosystem.
//!
//! Logs go to a daily-rotated file so they never draw over the TUI.
//! Failed tag lookups end up here; they are never shown in the UI.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "tagbox=info,warn";

/// Log level used by `--verbose`.
const VERBOSE_LOG_FILTER: &str = "tagbox=debug,warn";

/// File name prefix for rotated log files.
const LOG_FILE_PREFIX: &str = "tagbox.log";

/// Options controlling where and how much is logged.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Directory for log files; defaults to the platform data directory.
    pub directory: Option<PathBuf>,
    /// Raise the default filter to debug. `RUST_LOG` still wins.
    pub verbose: bool,
}

impl LogOptions {
    /// The filter directive used when `RUST_LOG` is not set.
    fn default_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }

    /// The directory logs will be written to.
    pub fn resolve_directory(&self) -> anyhow::Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(dir.clone()),
            None => get_log_directory(),
        }
    }
}

/// Initialize the logging system.
///
/// Sets up a daily rotating file appender, filtered by `RUST_LOG` or the
/// level chosen in `options`. Events carry file/line numbers and thread IDs.
///
/// # Log Directory
///
/// Unless overridden, logs are stored under the platform local data directory:
/// - Linux: `~/.local/share/tagbox/logs/`
/// - macOS: `~/Library/Application Support/tagbox/logs/`
/// - Windows: `C:\Users\<User>\AppData\Local\tagbox\logs\`
///
/// # Errors
///
/// Returns an error if the log directory cannot be determined or created, or
/// if a global subscriber is already set.
///
/// ```no_run
/// use tagbox::logging::{self, LogOptions};
///
/// logging::init(&LogOptions { verbose: true, ..Default::default() })
///     .expect("Failed to initialize logging");
/// ```
pub fn init(options: &LogOptions) -> anyhow::Result<PathBuf> {
    let log_dir = options.resolve_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_filter()));

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter);

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tagbox starting up");
    tracing::debug!(log_dir = %log_dir.display(), "Log directory");

    Ok(log_dir)
}

/// Platform default log directory: `<data_local_dir>/tagbox/logs`.
fn get_log_directory() -> anyhow::Result<PathBuf> {
    let base_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(base_dir.join("tagbox").join("logs"))
}

/// Log application shutdown.
pub fn shutdown(log_dir: &Path) {
    tracing::info!(log_dir = %log_dir.display(), "tagbox shutting down");
}
