//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AppLogger, NoOpLogger, UserRepository};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRepository>,
    pub logger: Arc<dyn AppLogger>,
}

impl HttpState {
    /// State backed by `users` with logging disabled.
    ///
    /// # Examples
    /// ```ignore
    /// let state = HttpState::new(Arc::new(repo)).with_logger(Arc::new(logger));
    /// ```
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Replace the application logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn AppLogger>) -> Self {
        self.logger = logger;
        self
    }
}
