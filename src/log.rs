//! Error and event logging.
//!
//! The [`LogSink`] trait decouples the session from whatever records its
//! failures; [`ErrorLog`] is the bundled in-memory implementation, an
//! explicitly constructed instance that callers share by `Arc` rather than
//! a process-wide singleton. The core consults a sink on failure paths
//! only and never depends on it for control flow.

use std::fmt;
use std::sync::Mutex;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Severity of a logged event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational message.
    Info,

    /// Something unexpected, but recoverable.
    Warning,

    /// An operation failed.
    Error,

    /// The application cannot continue.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// Severity of the event.
    pub severity: Severity,

    /// Human-readable description.
    pub message: String,

    /// Where the event originated.
    pub context: String,

    /// When the event was recorded.
    pub timestamp: OffsetDateTime,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let timestamp = self
            .timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| "-".to_string());
        if self.context.is_empty() {
            write!(f, "[{timestamp}] {}: {}", self.severity, self.message)
        } else {
            write!(
                f,
                "[{timestamp}] {}: {} ({})",
                self.severity, self.message, self.context
            )
        }
    }
}

/// A destination for logged events.
pub trait LogSink: Send + Sync {
    /// Record one event.
    fn log(&self, severity: Severity, message: &str, context: &str);
}

/// An in-memory, thread-safe event log.
///
/// Records are kept in arrival order and can be inspected, which makes
/// this sink useful both as the application's error history and as a
/// test double.
#[derive(Debug, Default)]
pub struct ErrorLog {
    records: Mutex<Vec<LogRecord>>,
}

impl ErrorLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an informational message.
    pub fn info(&self, message: &str, context: &str) {
        self.log(Severity::Info, message, context);
    }

    /// Records a warning.
    pub fn warning(&self, message: &str, context: &str) {
        self.log(Severity::Warning, message, context);
    }

    /// Records an error.
    pub fn error(&self, message: &str, context: &str) {
        self.log(Severity::Error, message, context);
    }

    /// Records a fatal error.
    pub fn fatal(&self, message: &str, context: &str) {
        self.log(Severity::Fatal, message, context);
    }

    /// Returns the most recent record, if any.
    pub fn last(&self) -> Option<LogRecord> {
        self.records
            .lock()
            .expect("log mutex poisoned")
            .last()
            .cloned()
    }

    /// Returns all records in arrival order.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("log mutex poisoned").clone()
    }

    /// Discards all records.
    pub fn clear(&self) {
        self.records.lock().expect("log mutex poisoned").clear();
    }
}

impl LogSink for ErrorLog {
    fn log(&self, severity: Severity, message: &str, context: &str) {
        let record = LogRecord {
            severity,
            message: message.to_string(),
            context: context.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        };
        self.records
            .lock()
            .expect("log mutex poisoned")
            .push(record);
    }
}
