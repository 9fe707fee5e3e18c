//! Infrastructure implementations for the collection platform.
//!
//! Storage traits live in [`traits`]; PostgreSQL implementations back the
//! server, SQLite implementations back local development and hermetic tests.

mod error;
pub mod postgres;
pub mod sqlite;
mod traits;

pub use error::*;
pub use traits::*;

pub use postgres::{
    PgActorDirectory, PgNotificationStore, PgSubmissionStore, PgTokenStore, PgZoneStore,
};
pub use sqlite::{
    SqliteActorDirectory, SqliteNotificationStore, SqliteSubmissionStore, SqliteTokenStore,
    SqliteZoneStore,
};
