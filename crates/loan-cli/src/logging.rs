//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Applicant names and amounts are personal data. They only reach the log
//! when `--log-data` is passed; otherwise [`redact_value`] substitutes
//! [`REDACTED_VALUE`].
//!
//! # Log Levels
//!
//! - `error`: unrecoverable failures
//! - `warn`: skipped log rows, rejected admin attempts
//! - `info`: model loaded, predictions, feedback appended
//! - `debug`: schema reindexing details
//!
//! # Usage
//!
//! ```ignore
//! use loan_cli::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::default().with_log_data(false);
//! init_logging(&config)?;
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Crates whose events pass the default filter at the configured level.
const WORKSPACE_TARGETS: [&str; 6] = [
    "loan_admin",
    "loan_cli",
    "loan_feedback",
    "loan_inference",
    "loan_model",
    "loan_transform",
];

static LOG_DATA_ENABLED: AtomicBool = AtomicBool::new(false);

/// Placeholder used when applicant values may not be logged.
pub const REDACTED_VALUE: &str = "[REDACTED]";

/// Returns true if applicant values may be logged.
pub fn log_data_enabled() -> bool {
    LOG_DATA_ENABLED.load(Ordering::Relaxed)
}

/// Returns the input when data logging is enabled, otherwise a redacted token.
pub fn redact_value(value: &str) -> &str {
    if log_data_enabled() {
        value
    } else {
        REDACTED_VALUE
    }
}

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Maximum level for workspace crates.
    pub level_filter: LevelFilter,
    /// Let `RUST_LOG` replace the level filter when set.
    pub use_env_filter: bool,
    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
    pub format: LogFormat,
    /// Optional log file path. When set, logs are appended to the file.
    pub log_file: Option<PathBuf>,
    /// Whether applicant values may be logged.
    pub log_data: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line format.
    #[default]
    Pretty,
    /// Compact single-line format.
    Compact,
    /// JSON lines for machine parsing.
    Json,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level_filter: LevelFilter::WARN,
            use_env_filter: true,
            with_timestamps: false,
            with_target: false,
            with_ansi: true,
            format: LogFormat::default(),
            log_file: None,
            log_data: false,
        }
    }
}

impl LogConfig {
    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log file path (writes to stderr when None).
    #[must_use]
    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    /// Enable or disable logging of applicant values.
    #[must_use]
    pub fn with_log_data(mut self, enable: bool) -> Self {
        self.log_data = enable;
        self
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> io::Result<()> {
    if let Some(path) = &config.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        init_logging_with_writer(config, SharedFileWriter::new(file));
    } else {
        init_logging_with_writer(config, io::stderr);
    }
    Ok(())
}

/// Initialize logging with a custom writer.
pub fn init_logging_with_writer<W>(config: &LogConfig, writer: W)
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    LOG_DATA_ENABLED.store(config.log_data, Ordering::Release);
    let filter = build_env_filter(config.level_filter, config.use_env_filter);

    match config.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(config.with_target);
            tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(config.with_ansi)
                .with_target(config.with_target);
            if config.with_timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer)
                    .init();
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(layer.without_time())
                    .init();
            }
        }
    }
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<std::fs::File>>,
}

impl SharedFileWriter {
    fn new(file: std::fs::File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        guard.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

/// Filter directives for the workspace crates at `level`. Other crates stay
/// at `warn`.
fn default_directives(level: LevelFilter) -> String {
    let level = level.to_string().to_lowercase();
    let mut directives = String::from("warn");
    for target in WORKSPACE_TARGETS {
        directives.push_str(&format!(",{target}={level}"));
    }
    directives
}

fn build_env_filter(level: LevelFilter, use_env_filter: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(default_directives(level));
    if use_env_filter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
    } else {
        fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_redacted_by_default() {
        assert!(!log_data_enabled());
        assert_eq!(redact_value("Ayesha"), REDACTED_VALUE);
    }

    #[test]
    fn directives_cover_every_workspace_crate() {
        let directives = default_directives(LevelFilter::DEBUG);
        assert!(directives.starts_with("warn,"));
        for target in WORKSPACE_TARGETS {
            assert!(directives.contains(&format!("{target}=debug")));
        }
    }
}
