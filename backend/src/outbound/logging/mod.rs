//! Application logging adapter implementing the `AppLogger` port.
//!
//! [`FanOutLogger`] filters entries against a threshold level and hands each
//! surviving entry to every configured [`LogSink`]. Two sinks ship with the
//! crate:
//!
//! - [`ConsoleSink`]: one formatted line per entry on stdout.
//! - [`LogtailSink`]: batched delivery to a Logtail HTTP collector.

mod console;
mod logtail;

use std::sync::Arc;

use crate::domain::ports::AppLogger;
use crate::domain::{LogEntry, LogLevel, LogMetadata};

pub use console::ConsoleSink;
pub use logtail::{LogShippingError, LogtailConfig, LogtailSink};

/// Destination for formatted log entries.
///
/// Implementations must not block the caller on I/O they do not control and
/// must swallow their own delivery failures.
pub trait LogSink: Send + Sync {
    /// Deliver one entry.
    fn deliver(&self, entry: &LogEntry);
}

/// Logger dispatching each enabled entry to all sinks.
#[derive(Clone)]
pub struct FanOutLogger {
    threshold: LogLevel,
    sinks: Vec<Arc<dyn LogSink>>,
}

impl FanOutLogger {
    /// Logger with no sinks accepting every level.
    #[must_use]
    pub fn new() -> Self {
        Self {
            threshold: LogLevel::Debug,
            sinks: Vec::new(),
        }
    }

    /// Drop entries less severe than `threshold`.
    #[must_use]
    pub fn with_threshold(mut self, threshold: LogLevel) -> Self {
        self.threshold = threshold;
        self
    }

    /// Append a sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Current threshold.
    #[must_use]
    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }
}

impl Default for FanOutLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl AppLogger for FanOutLogger {
    fn log(&self, level: LogLevel, message: &str, metadata: LogMetadata) {
        if !level.is_enabled_at(self.threshold) || self.sinks.is_empty() {
            return;
        }
        let entry = LogEntry::new(level, message, metadata);
        for sink in &self.sinks {
            sink.deliver(&entry);
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for level filtering and fan-out.
    use super::*;
    use crate::domain::ports::AppLoggerExt;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingSink {
        entries: Mutex<Vec<LogEntry>>,
    }

    impl CapturingSink {
        fn messages(&self) -> Vec<String> {
            self.entries
                .lock()
                .expect("sink lock")
                .iter()
                .map(|entry| entry.message().to_owned())
                .collect()
        }
    }

    impl LogSink for CapturingSink {
        fn deliver(&self, entry: &LogEntry) {
            self.entries.lock().expect("sink lock").push(entry.clone());
        }
    }

    #[rstest]
    #[case(LogLevel::Alert, vec!["alert"])]
    #[case(LogLevel::Warn, vec!["alert", "error", "warn"])]
    #[case(LogLevel::Debug, vec!["alert", "error", "warn", "info", "debug"])]
    fn threshold_filters_less_severe_entries(
        #[case] threshold: LogLevel,
        #[case] expected: Vec<&str>,
    ) {
        let sink = Arc::new(CapturingSink::default());
        let logger = FanOutLogger::new()
            .with_threshold(threshold)
            .with_sink(sink.clone());

        for level in LogLevel::ALL {
            logger.log(level, level.as_str(), LogMetadata::new());
        }

        assert_eq!(sink.messages(), expected);
    }

    #[rstest]
    fn every_sink_receives_the_same_entry() {
        let first = Arc::new(CapturingSink::default());
        let second = Arc::new(CapturingSink::default());
        let logger = FanOutLogger::default()
            .with_sink(first.clone())
            .with_sink(second.clone());

        let mut metadata = LogMetadata::new();
        metadata.insert("id".into(), json!(7));
        logger.info("user created", metadata);

        let a = first.entries.lock().expect("sink lock").clone();
        let b = second.entries.lock().expect("sink lock").clone();
        assert_eq!(a, b);
        assert_eq!(a.len(), 1);
        assert_eq!(a.first().map(|e| e.metadata().get("id")), Some(Some(&json!(7))));
    }

    #[rstest]
    fn default_threshold_is_debug() {
        assert_eq!(FanOutLogger::default().threshold(), LogLevel::Debug);
    }
}
