//! Diesel table definitions for the MySQL schema.
//!
//! These definitions must match [`CREATE_USERS_TABLE`], which the adapter runs
//! at startup. There are no migrations: the table is created if absent and
//! otherwise left alone.

/// Idempotent DDL for the `users` table.
pub(crate) const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS users (\
    id INT AUTO_INCREMENT PRIMARY KEY, \
    name VARCHAR(255), \
    email VARCHAR(255)\
)";

diesel::table! {
    /// User rows.
    ///
    /// `id` is allocated by MySQL's auto-increment counter.
    users (id) {
        /// Primary key.
        id -> Integer,
        /// Free-form name, nullable.
        name -> Nullable<Varchar>,
        /// Free-form email, nullable and not unique.
        email -> Nullable<Varchar>,
    }
}
