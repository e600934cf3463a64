//! Process logging.
//!
//! Installs the global `tracing` subscriber for one service, configured from
//! that service's `WebServer` block. With a `LogFile` set, records go to a
//! daily-rotated file named after the log file and the host (or Kubernetes
//! pod); otherwise they go to stdout.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::WebServer;

/// Error returned when logging cannot be initialized.
#[derive(Debug)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    AlreadyInitialized(String),
    /// The rotating log file could not be set up.
    InvalidLogFile { path: String, message: String },
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInitialized(reason) => {
                write!(f, "logging already initialized: {reason}")
            }
            Self::InvalidLogFile { path, message } => {
                write!(f, "unable to open log file {path}: {message}")
            }
        }
    }
}

impl std::error::Error for LoggingError {}

/// Keeps the background log writer alive. Hold it until the process exits,
/// or buffered records are lost.
#[derive(Debug)]
#[must_use = "dropping the guard stops the log writer"]
pub struct LogGuard {
    _worker: Option<WorkerGuard>,
}

/// Default filter directive for a `Verbose` level.
#[must_use]
pub const fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// File name prefix for rotated logs: `<log_file>_<hostname>`, or
/// `<log_file>` alone when the host is unknown.
#[must_use]
pub fn log_file_prefix(log_file: &str, hostname: Option<&str>) -> String {
    match hostname {
        Some(host) if !host.is_empty() => format!("{log_file}_{host}"),
        _ => log_file.to_string(),
    }
}

/// The name this process logs under: `MY_POD_NAME` in Kubernetes, else the
/// kernel host name.
#[must_use]
pub fn hostname() -> Option<String> {
    hostname_with_pod(std::env::var("MY_POD_NAME").ok())
}

/// Prefer a non-empty pod name, falling back to the kernel host name.
#[must_use]
pub fn hostname_with_pod(pod_name: Option<String>) -> Option<String> {
    pod_name
        .filter(|name| !name.is_empty())
        .or_else(|| gethostname::gethostname().into_string().ok())
        .filter(|name| !name.is_empty())
}

/// Build a daily-rotating appender for `log_file`.
///
/// Files land next to `log_file` and are named
/// `<file name>_<hostname>.<YYYY-MM-DD>`.
///
/// # Errors
///
/// Returns `LoggingError::InvalidLogFile` if `log_file` has no file name or
/// the directory cannot be prepared.
pub fn rolling_appender(
    log_file: &str,
    hostname: Option<&str>,
) -> Result<RollingFileAppender, LoggingError> {
    let invalid = |message: String| LoggingError::InvalidLogFile {
        path: log_file.to_string(),
        message,
    };

    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| invalid("missing file name".to_string()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(log_file_prefix(file_name, hostname))
        .build(directory)
        .map_err(|e| invalid(e.to_string()))
}

/// Install the global subscriber for a service.
///
/// `RUST_LOG` overrides the level derived from `Verbose`. `LogLongFile`
/// adds source file and line to each record; `ColorConsole` enables ANSI
/// colors on stdout.
///
/// # Errors
///
/// Returns `LoggingError::InvalidLogFile` if the log file cannot be set up,
/// or `LoggingError::AlreadyInitialized` if a subscriber is already installed.
pub fn init_logging(web_server: &WebServer) -> Result<LogGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(web_server.verbose)));
    let long = web_server.log_long_file;

    if web_server.log_file.is_empty() {
        let layer = fmt::layer()
            .with_ansi(web_server.options.color_console)
            .with_file(long)
            .with_line_number(long);
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
        return Ok(LogGuard { _worker: None });
    }

    let appender = rolling_appender(&web_server.log_file, hostname().as_deref())?;
    let (writer, worker) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_file(long)
        .with_line_number(long);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    Ok(LogGuard {
        _worker: Some(worker),
    })
}
