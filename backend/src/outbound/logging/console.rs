//! Console sink writing formatted lines to stdout.

use std::io::{self, Write};
use std::sync::Mutex;

use tracing::debug;

use crate::domain::LogEntry;

use super::LogSink;

/// Sink writing one formatted line per entry to a writer (stdout by default).
pub struct ConsoleSink<W = io::Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    /// Sink writing to the process's standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consume the sink and return its writer.
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> LogSink for ConsoleSink<W> {
    fn deliver(&self, entry: &LogEntry) {
        let line = entry.format_line();
        let mut writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(error) = writeln!(writer, "{line}").and_then(|()| writer.flush()) {
            debug!(%error, "console log sink write failed");
        }
    }
}
