//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the MySQL store, log sinks). Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants instead of
//! returning `anyhow::Result`.

mod app_logger;
mod macros;
mod user_repository;

pub(crate) use macros::define_port_error;

pub use app_logger::{AppLogger, AppLoggerExt, NoOpLogger};
#[cfg(test)]
pub use app_logger::MockAppLogger;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
