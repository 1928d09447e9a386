//! Domain primitives and ports.
//!
//! Purpose: Define the strongly typed entities shared by the HTTP and
//! persistence adapters, and the ports through which handlers reach the store
//! and the log sinks.
//!
//! Public surface:
//! - Error / ErrorCode — error payload returned to HTTP clients.
//! - User / UserId / UserDraft — the `users` table row and its writable fields.
//! - LogEntry / LogLevel / LogMetadata — application log entries.

pub mod error;
pub mod log_entry;
pub mod ports;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::log_entry::{LogEntry, LogLevel, LogMetadata};
pub use self::user::{User, UserDraft, UserId, UserIdParseError};

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";
