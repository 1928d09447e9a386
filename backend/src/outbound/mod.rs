//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: MySQL-backed `UserRepository` using Diesel ORM
//! - **logging**: `AppLogger` fanning entries out to console and Logtail sinks
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod logging;
pub mod persistence;
