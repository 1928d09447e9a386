//! MySQL persistence adapter using Diesel ORM.
//!
//! This module provides the concrete implementation of the domain's
//! `UserRepository` port, backed by MySQL via Diesel with async support
//! through `diesel-async` and a single-connection `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapter**: the repository only translates between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and the table
//!   definition (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database and pool errors map to
//!   `UserPersistenceError`.
//!
//! # Example
//!
//! ```ignore
//! use users_api::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("mysql://localhost/users")).await?;
//! let repo = DieselUserRepository::new(pool);
//! repo.ensure_schema().await?;
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
