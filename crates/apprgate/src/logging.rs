//! # Logging
//!
//! Structured logging on top of `tracing`.
//!
//! Console output in one of three formats, an optional daily-rolling log file
//! written through a non-blocking worker, and helpers for correlation ids and
//! credential redaction.
//!
//! ## Quick Start
//!
//! ```no_run
//! use apprgate::logging::{init_logging, LogConfig};
//!
//! let _guard = init_logging(&LogConfig::default()).expect("logging init");
//! tracing::info!("approval gate started");
//! ```
//!
//! ## File Logging
//!
//! ```no_run
//! use std::path::PathBuf;
//! use apprgate::logging::{LogConfig, LogFormat, LogLevel};
//!
//! let config = LogConfig {
//!     level: LogLevel::Debug,
//!     format: LogFormat::Json,
//!     file_path: Some(PathBuf::from("/var/log/apprgate/apprgate.log")),
//!     correlation_ids: true,
//! };
//! ```
//!
//! ## Redaction
//!
//! ```
//! use apprgate::logging::redact_sensitive;
//!
//! assert_eq!(redact_sensitive("ak-0123456789abcdef"), "ak-0***cdef");
//! assert_eq!(redact_sensitive("short"), "***");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as tfmt, EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Errors from [`init_logging`].
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log file or its directory could not be created.
    #[error("failed to create log file: {0}")]
    FileCreation(String),

    /// A global subscriber is already installed, or installation failed.
    #[error("failed to initialize logging: {0}")]
    SubscriberInit(String),

    /// The configuration is unusable.
    #[error("invalid log configuration: {0}")]
    InvalidConfig(String),
}

/// Minimum severity to record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Everything.
    Trace,
    /// Debug and above.
    Debug,
    /// Info and above.
    #[default]
    Info,
    /// Warnings and errors.
    Warn,
    /// Errors only.
    Error,
}

impl LogLevel {
    /// The matching `tracing` level.
    #[must_use]
    pub const fn as_tracing_level(self) -> Level {
        match self {
            Self::Trace => Level::TRACE,
            Self::Debug => Level::DEBUG,
            Self::Info => Level::INFO,
            Self::Warn => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Directive string for [`EnvFilter`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-oriented.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
    /// One line per event.
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Minimum level. `RUST_LOG`-style directives are not read from the environment.
    pub level: LogLevel,

    /// Output format, used for both console and file.
    pub format: LogFormat,

    /// Also write to this file, rotated daily. The directory is created if missing.
    pub file_path: Option<PathBuf>,

    /// Emit span context (where rounds carry their correlation id) with each event.
    pub correlation_ids: bool,
}

/// Keeps the file writer alive; logs are flushed when it is dropped.
pub struct LogGuard {
    guard: Option<WorkerGuard>,
}

impl LogGuard {
    const fn new(guard: Option<WorkerGuard>) -> Self {
        Self { guard }
    }
}

impl fmt::Debug for LogGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogGuard")
            .field("has_file_guard", &self.guard.is_some())
            .finish()
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LogError`] if the log directory cannot be created, the file name
/// is unusable, or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<LogGuard, LogError> {
    let filter = EnvFilter::try_new(config.level.as_str())
        .map_err(|e| LogError::InvalidConfig(e.to_string()))?;

    let mut layers = vec![console_layer(config)];
    let guard = match &config.file_path {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            layers.push(file_layer(config.format, writer));
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| LogError::SubscriberInit(e.to_string()))?;

    Ok(LogGuard::new(guard))
}

fn console_layer(config: &LogConfig) -> BoxedLayer {
    let span_events = if config.correlation_ids {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    match config.format {
        LogFormat::Pretty => tfmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(span_events)
            .boxed(),
        LogFormat::Json => tfmt::layer()
            .json()
            .with_target(true)
            .with_current_span(config.correlation_ids)
            .with_span_list(config.correlation_ids)
            .boxed(),
        LogFormat::Compact => tfmt::layer().compact().with_target(true).boxed(),
    }
}

fn file_layer(format: LogFormat, writer: NonBlocking) -> BoxedLayer {
    match format {
        LogFormat::Json => tfmt::layer().json().with_writer(writer).with_target(true).boxed(),
        LogFormat::Pretty | LogFormat::Compact => tfmt::layer()
            .compact()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .boxed(),
    }
}

fn file_writer(path: &Path) -> Result<(NonBlocking, WorkerGuard), LogError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| LogError::FileCreation(format!("{}: {e}", dir.display())))?;

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LogError::InvalidConfig("invalid log file name".to_string()))?;

    Ok(tracing_appender::non_blocking(
        tracing_appender::rolling::daily(dir, file_name),
    ))
}

/// Masks a credential for logging: first and last 4 characters of values of
/// 12 characters or more, `***` otherwise.
#[must_use]
pub fn redact_sensitive(value: &str) -> String {
    const MIN_LENGTH_FOR_PARTIAL: usize = 12;
    const VISIBLE_CHARS: usize = 4;

    let chars: Vec<char> = value.chars().collect();
    if chars.len() < MIN_LENGTH_FOR_PARTIAL {
        return "***".to_string();
    }

    let prefix: String = chars.iter().take(VISIBLE_CHARS).collect();
    let suffix: String = chars.iter().skip(chars.len() - VISIBLE_CHARS).collect();
    format!("{prefix}***{suffix}")
}

/// A 16-character hex id, unique within the process.
#[must_use]
pub fn new_correlation_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);

    format!("{:08x}{:08x}", nanos, counter & 0xffff_ffff)
}

/// Maps `-v` repetitions to a level: none is warn, then info, debug, trace.
#[must_use]
pub const fn verbosity_to_level(verbosity: u8) -> LogLevel {
    match verbosity {
        0 => LogLevel::Warn,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}
