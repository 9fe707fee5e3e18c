//! SQLite implementations of the storage traits.
//!
//! Used for local single-node deployments and for hermetic integration
//! tests against an in-memory database. Identifiers and timestamps are
//! stored as TEXT (hyphenated UUIDs, RFC 3339), matching how the rows are
//! bound below.

mod actors;
mod notifications;
mod submissions;
mod tokens;
mod zones;

pub use actors::SqliteActorDirectory;
pub use notifications::SqliteNotificationStore;
pub use submissions::SqliteSubmissionStore;
pub use tokens::SqliteTokenStore;
pub use zones::SqliteZoneStore;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::CoreError;

/// Parse a TEXT uuid column, surfacing corrupt rows as internal errors.
pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(value)
        .map_err(|_| CoreError::Internal(format!("corrupt uuid in column {column}: {value}")))
}

/// Parse a TEXT RFC 3339 timestamp column.
pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, CoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CoreError::Internal(format!("corrupt timestamp in column {column}: {value}")))
}
