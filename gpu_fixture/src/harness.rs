/// Harness - process-wide logger slot shared by all fixture components
///
/// The graphics device is never stored here: every factory call receives
/// the device explicitly. Only the log sink is global, so that tests can
/// capture what the factories report.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_slot() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

pub struct Harness;

impl Harness {
    /// Replace the active logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gpu_fixture::fixture::Harness;
    /// use gpu_fixture::fixture::log::{Logger, LogEntry};
    ///
    /// struct Silent;
    /// impl Logger for Silent {
    ///     fn log(&self, _entry: &LogEntry) {}
    /// }
    ///
    /// Harness::set_logger(Silent);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to DefaultLogger
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_slot().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Log without source location (used by fixture_info!, fixture_warn!, ...)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Log with file:line (used by fixture_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_slot().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}
