//! Port for application logging.
//!
//! Handlers log through [`AppLogger`] so the sinks behind it (console,
//! remote collector, nothing at all) are chosen at wiring time. Logging is
//! synchronous and infallible from the caller's side: adapters must never
//! block on network delivery or report sink failures back.

use crate::domain::{LogLevel, LogMetadata};

/// Leveled application logger.
#[cfg_attr(test, mockall::automock)]
pub trait AppLogger: Send + Sync {
    /// Record `message` at `level` with structured `metadata`.
    fn log(&self, level: LogLevel, message: &str, metadata: LogMetadata);
}

/// Per-level convenience methods for any [`AppLogger`].
///
/// # Examples
/// ```
/// use users_api::domain::LogMetadata;
/// use users_api::domain::ports::{AppLoggerExt, NoOpLogger};
///
/// NoOpLogger.info("server started", LogMetadata::new());
/// ```
pub trait AppLoggerExt: AppLogger {
    /// Log at [`LogLevel::Alert`].
    fn alert(&self, message: &str, metadata: LogMetadata) {
        self.log(LogLevel::Alert, message, metadata);
    }

    /// Log at [`LogLevel::Error`].
    fn error(&self, message: &str, metadata: LogMetadata) {
        self.log(LogLevel::Error, message, metadata);
    }

    /// Log at [`LogLevel::Warn`].
    fn warn(&self, message: &str, metadata: LogMetadata) {
        self.log(LogLevel::Warn, message, metadata);
    }

    /// Log at [`LogLevel::Info`].
    fn info(&self, message: &str, metadata: LogMetadata) {
        self.log(LogLevel::Info, message, metadata);
    }

    /// Log at [`LogLevel::Debug`].
    fn debug(&self, message: &str, metadata: LogMetadata) {
        self.log(LogLevel::Debug, message, metadata);
    }
}

impl<T: AppLogger + ?Sized> AppLoggerExt for T {}

/// Logger that discards every entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLogger;

impl AppLogger for NoOpLogger {
    fn log(&self, _level: LogLevel, _message: &str, _metadata: LogMetadata) {}
}
