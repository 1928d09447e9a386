//! Test utilities for the users-api crate.
//!
//! This module provides shared doubles for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{AppLogger, UserPersistenceError, UserRepository};
use crate::domain::{LogEntry, LogLevel, LogMetadata, User, UserDraft, UserId};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    last_id: i32,
}

/// `UserRepository` keeping rows in memory with auto-increment ids.
///
/// Mirrors the store's observable behaviour: rows come back in insertion
/// order, ids are never reused, and updates or deletes of unknown ids
/// succeed without effect. [`Self::set_unavailable`] makes every call fail
/// with a connection error.
///
/// # Examples
/// ```
/// use users_api::domain::UserDraft;
/// use users_api::domain::ports::UserRepository;
/// use users_api::test_support::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryUserRepository::default();
/// let user = repo.create(&UserDraft::new(Some("Ana".into()), None)).await.unwrap();
/// assert_eq!(user.id().get(), 1);
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
    unavailable: AtomicBool,
}

impl InMemoryUserRepository {
    /// Toggle simulated store outage.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Snapshot of the stored rows.
    pub fn rows(&self) -> Vec<User> {
        lock(&self.table).rows.clone()
    }

    fn check_available(&self) -> Result<(), UserPersistenceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(UserPersistenceError::connection(
                "connect ECONNREFUSED 127.0.0.1:3306",
            ))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        self.check_available()?;
        Ok(self.rows())
    }

    async fn create(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        self.check_available()?;
        let mut table = lock(&self.table);
        table.last_id += 1;
        let user = draft.clone().into_user(UserId::new(table.last_id));
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<(), UserPersistenceError> {
        self.check_available()?;
        let mut table = lock(&self.table);
        if let Some(row) = table.rows.iter_mut().find(|row| row.id() == id) {
            *row = draft.clone().into_user(id);
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        self.check_available()?;
        lock(&self.table).rows.retain(|row| row.id() != id);
        Ok(())
    }
}

/// `AppLogger` capturing every entry for later assertions.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    /// Every captured entry, oldest first.
    pub fn entries(&self) -> Vec<LogEntry> {
        lock(&self.entries).clone()
    }

    /// Captured entries at `level`.
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        lock(&self.entries)
            .iter()
            .filter(|entry| entry.level() == level)
            .cloned()
            .collect()
    }
}

impl AppLogger for RecordingLogger {
    fn log(&self, level: LogLevel, message: &str, metadata: LogMetadata) {
        lock(&self.entries).push(LogEntry::new(level, message, metadata));
    }
}
