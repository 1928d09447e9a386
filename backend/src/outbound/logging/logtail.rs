//! Remote sink shipping entries to a Logtail (Better Stack) HTTP endpoint.
//!
//! Delivery is decoupled from the caller: [`LogtailSink::deliver`] only
//! performs a non-blocking `try_send` onto a bounded queue. A background task
//! drains the queue in batches and POSTs them as a JSON array with the access
//! token as a bearer credential. When the queue is full the entry is dropped
//! and counted; failed requests are logged via `tracing` and never retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::{LogEntry, LogMetadata};

use super::LogSink;

const DEFAULT_QUEUE_CAPACITY: usize = 1024;
const DEFAULT_BATCH_SIZE: usize = 64;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised while starting the shipping task.
#[derive(Debug, Error)]
pub enum LogShippingError {
    /// The HTTP client could not be constructed.
    #[error("failed to build log shipping client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection and queueing settings for [`LogtailSink`].
#[derive(Clone)]
pub struct LogtailConfig {
    endpoint: Url,
    token: String,
    queue_capacity: usize,
    batch_size: usize,
    request_timeout: Duration,
}

impl LogtailConfig {
    /// Settings for `endpoint` authenticated with `token`.
    ///
    /// Defaults: queue of 1024 entries, batches of up to 64, 10 second
    /// request timeout.
    pub fn new(endpoint: Url, token: impl Into<String>) -> Self {
        Self {
            endpoint,
            token: token.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Bound on queued, not yet shipped entries.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Maximum entries per request.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Timeout applied to each shipping request.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Endpoint entries are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl std::fmt::Debug for LogtailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogtailConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &"<redacted>")
            .field("queue_capacity", &self.queue_capacity)
            .field("batch_size", &self.batch_size)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Wire shape of one shipped entry.
#[derive(Debug, Serialize)]
struct LogtailRecord<'a> {
    dt: String,
    level: &'static str,
    message: &'a str,
    #[serde(flatten)]
    metadata: &'a LogMetadata,
}

impl<'a> From<&'a LogEntry> for LogtailRecord<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            dt: entry.timestamp_iso8601(),
            level: entry.level().as_str(),
            message: entry.message(),
            metadata: entry.metadata(),
        }
    }
}

/// Sink enqueueing entries for the background shipping task.
#[derive(Clone)]
pub struct LogtailSink {
    sender: mpsc::Sender<LogEntry>,
    dropped: Arc<AtomicU64>,
}

impl LogtailSink {
    /// Start the shipping task on the current tokio runtime.
    ///
    /// The task ends once every clone of the returned sink has been dropped
    /// and the queue has been drained.
    ///
    /// # Errors
    ///
    /// Returns [`LogShippingError::Client`] when the HTTP client cannot be
    /// built.
    pub fn spawn(config: LogtailConfig) -> Result<(Self, JoinHandle<()>), LogShippingError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let (sink, receiver) = Self::with_queue(config.queue_capacity);
        let worker = LogtailWorker {
            client,
            endpoint: config.endpoint,
            token: config.token,
            batch_size: config.batch_size,
        };
        let handle = tokio::spawn(worker.run(receiver));
        Ok((sink, handle))
    }

    fn with_queue(capacity: usize) -> (Self, mpsc::Receiver<LogEntry>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let sink = Self {
            sender,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, receiver)
    }

    /// Number of entries discarded because the queue was full.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl LogSink for LogtailSink {
    fn deliver(&self, entry: &LogEntry) {
        match self.sender.try_send(entry.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                if dropped.is_power_of_two() {
                    warn!(dropped, "log shipping queue full, dropping entries");
                }
            }
            Err(TrySendError::Closed(_)) => {
                debug!("log shipping task stopped, entry discarded");
            }
        }
    }
}

struct LogtailWorker {
    client: Client,
    endpoint: Url,
    token: String,
    batch_size: usize,
}

impl LogtailWorker {
    async fn run(self, mut receiver: mpsc::Receiver<LogEntry>) {
        let mut batch = Vec::with_capacity(self.batch_size);
        while receiver.recv_many(&mut batch, self.batch_size).await > 0 {
            self.ship(&batch).await;
            batch.clear();
        }
        debug!("log shipping queue closed");
    }

    async fn ship(&self, batch: &[LogEntry]) {
        let records: Vec<LogtailRecord<'_>> = batch.iter().map(LogtailRecord::from).collect();
        let result = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&records)
            .send()
            .await;
        match result {
            Ok(response) if response.status().is_success() => {}
            Ok(response) => {
                warn!(status = %response.status(), entries = batch.len(), "log collector rejected batch");
            }
            Err(error) => {
                warn!(%error, entries = batch.len(), "log shipping request failed");
            }
        }
    }
}
