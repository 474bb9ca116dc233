//! Logging for the GPU fixture library
//!
//! - Customizable sink via the Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - File and line information for ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// Implement this trait to redirect fixture logs (to a file, to a
/// capture buffer in tests, ...) and install it with `Harness::set_logger`.
///
/// # Example
///
/// ```no_run
/// use gpu_fixture::fixture::log::{Logger, LogEntry};
///
/// struct StderrLogger;
///
/// impl Logger for StderrLogger {
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("[{}] {}", entry.source, entry.message);
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g. "gpu_fixture::buffer", "gpu_fixture::mock")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Per-view derivation details
    Trace,

    /// Compiled descriptors
    Debug,

    /// Scenario milestones
    Info,

    /// Skipped requests, outstanding objects
    Warn,

    /// Failed creations (with file:line)
    Error,
}

/// Default logger printing colored lines to stdout
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp, severity_str, source, entry.message, file, line
            );
        } else {
            println!("[{}] [{}] [{}] {}", timestamp, severity_str, source, entry.message);
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message
#[macro_export]
macro_rules! fixture_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::fixture::Harness::log(
            $crate::fixture::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! fixture_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::fixture::Harness::log(
            $crate::fixture::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message
#[macro_export]
macro_rules! fixture_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::fixture::Harness::log(
            $crate::fixture::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message
#[macro_export]
macro_rules! fixture_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::fixture::Harness::log(
            $crate::fixture::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
///
/// # Example
///
/// ```no_run
/// # use gpu_fixture::fixture_error;
/// fixture_error!("gpu_fixture::buffer", "CreateBuffer failed: {}", "0x80070057");
/// ```
#[macro_export]
macro_rules! fixture_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::fixture::Harness::log_detailed(
            $crate::fixture::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and evaluate to a fatal configuration `Error`
///
/// ```no_run
/// # use gpu_fixture::fixture_err;
/// let err = fixture_err!("gpu_fixture::buffer", "stride {} does not divide {}", 12, 64);
/// assert!(err.is_fatal());
/// ```
#[macro_export]
macro_rules! fixture_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::fixture_error!($source, "{}", message);
        $crate::fixture::Error::InvalidConfiguration(message)
    }};
}

/// Log an ERROR and return early with a fatal configuration `Error`
#[macro_export]
macro_rules! fixture_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::fixture_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
