//! PostgreSQL implementations of the storage traits. This is the backend
//! the server runs against.

mod actors;
mod notifications;
mod submissions;
mod tokens;
mod zones;

pub use actors::PgActorDirectory;
pub use notifications::PgNotificationStore;
pub use submissions::PgSubmissionStore;
pub use tokens::PgTokenStore;
pub use zones::PgZoneStore;
