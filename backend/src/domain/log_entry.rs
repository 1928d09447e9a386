//! Application log entries and severity levels.
//!
//! Levels form a fixed, totally ordered set. Lower priority numbers are more
//! severe; `alert` sits above `error` at priority 0 and is never filtered out.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured metadata attached to a log entry.
pub type LogMetadata = Map<String, Value>;

/// Severity of an application log entry.
///
/// The derived ordering follows priority: `Alert < Error < Warn < Info < Debug`.
///
/// # Examples
/// ```
/// use users_api::domain::LogLevel;
///
/// assert!(LogLevel::Alert < LogLevel::Error);
/// assert!(LogLevel::Warn.is_enabled_at(LogLevel::Info));
/// assert!(!LogLevel::Debug.is_enabled_at(LogLevel::Info));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Conditions that need immediate operator attention.
    Alert,
    /// Failed operations.
    Error,
    /// Unexpected but tolerated conditions.
    Warn,
    /// Normal operational messages.
    Info,
    /// Diagnostic detail.
    Debug,
}

impl LogLevel {
    /// Every level, most severe first.
    pub const ALL: [Self; 5] = [Self::Alert, Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Numeric priority; 0 is the most severe.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Alert => 0,
            Self::Error => 1,
            Self::Warn => 2,
            Self::Info => 3,
            Self::Debug => 4,
        }
    }

    /// Lowercase name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Uppercase label used in formatted lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Alert => "ALERT",
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Whether an entry at this level passes a `threshold` filter.
    #[must_use]
    pub const fn is_enabled_at(self, threshold: Self) -> bool {
        self.priority() <= threshold.priority()
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One application log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    timestamp: DateTime<Utc>,
    level: LogLevel,
    message: String,
    metadata: LogMetadata,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(level: LogLevel, message: impl Into<String>, metadata: LogMetadata) -> Self {
        Self::at(Utc::now(), level, message, metadata)
    }

    /// Create an entry with an explicit timestamp.
    pub fn at(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        metadata: LogMetadata,
    ) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            metadata,
        }
    }

    /// When the entry was created.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Severity.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured metadata, possibly empty.
    #[must_use]
    pub const fn metadata(&self) -> &LogMetadata {
        &self.metadata
    }

    /// ISO 8601 timestamp with millisecond precision and a `Z` suffix.
    #[must_use]
    pub fn timestamp_iso8601(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Render `[<timestamp>] <LEVEL>: <message> <metadata JSON or empty>`.
    ///
    /// The separator before the metadata is always present, so an entry
    /// without metadata ends in a single space.
    ///
    /// # Examples
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use users_api::domain::{LogEntry, LogLevel, LogMetadata};
    ///
    /// let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    /// let entry = LogEntry::at(at, LogLevel::Info, "ready", LogMetadata::new());
    /// assert_eq!(entry.format_line(), "[2024-05-01T12:00:00.000Z] INFO: ready ");
    /// ```
    #[must_use]
    pub fn format_line(&self) -> String {
        let metadata = if self.metadata.is_empty() {
            String::new()
        } else {
            Value::Object(self.metadata.clone()).to_string()
        };
        format!(
            "[{}] {}: {} {}",
            self.timestamp_iso8601(),
            self.level.label(),
            self.message,
            metadata
        )
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    fn priorities_are_strictly_ordered() {
        let priorities: Vec<u8> = LogLevel::ALL.iter().map(|level| level.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3, 4]);
        assert!(LogLevel::ALL.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[rstest]
    #[case(LogLevel::Alert, LogLevel::Alert, true)]
    #[case(LogLevel::Alert, LogLevel::Debug, true)]
    #[case(LogLevel::Error, LogLevel::Warn, true)]
    #[case(LogLevel::Info, LogLevel::Warn, false)]
    #[case(LogLevel::Debug, LogLevel::Info, false)]
    fn threshold_filtering(
        #[case] level: LogLevel,
        #[case] threshold: LogLevel,
        #[case] expected: bool,
    ) {
        assert_eq!(level.is_enabled_at(threshold), expected);
    }

    #[rstest]
    fn formats_line_without_metadata(at: DateTime<Utc>) {
        let entry = LogEntry::at(at, LogLevel::Alert, "disk full", LogMetadata::new());
        assert_eq!(entry.format_line(), "[2025-01-02T03:04:05.000Z] ALERT: disk full ");
    }

    #[rstest]
    fn formats_line_with_metadata(at: DateTime<Utc>) {
        let mut metadata = LogMetadata::new();
        metadata.insert("error".into(), json!("connection refused"));
        let entry = LogEntry::at(at, LogLevel::Error, "failed to list users", metadata);

        assert_eq!(
            entry.format_line(),
            r#"[2025-01-02T03:04:05.000Z] ERROR: failed to list users {"error":"connection refused"}"#
        );
    }

    #[rstest]
    fn level_serialises_lowercase() {
        let value = serde_json::to_value(LogLevel::Warn).expect("serialise level");
        assert_eq!(value, json!("warn"));
    }
}
