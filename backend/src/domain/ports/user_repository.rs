//! Port for user persistence.
//!
//! The [`UserRepository`] trait is the only way handlers reach the store.
//! Every method maps to exactly one statement against the `users` table
//! (create additionally reads back the generated key on the same
//! connection). Updates and deletes that match no row succeed silently.

use async_trait::async_trait;

use crate::domain::{User, UserDraft, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// The store connection could not be obtained or was lost.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// The statement failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
    }
}

/// Port for `users` table access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Return every stored user in natural storage order.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Insert a user and return it with its store-assigned identifier.
    async fn create(&self, draft: &UserDraft) -> Result<User, UserPersistenceError>;

    /// Overwrite name and email for `id`.
    ///
    /// Succeeds without effect when no row has this identifier.
    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<(), UserPersistenceError>;

    /// Remove the row with `id`.
    ///
    /// Succeeds without effect when no row has this identifier.
    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError>;
}
