//! Trait definitions for the platform's storage collaborators.
//!
//! The core never talks to a database directly; it goes through these
//! traits. Both backends (Postgres for production, SQLite for local use and
//! hermetic tests) implement the same contracts.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use uuid::Uuid;

use crate::domain::{
    Actor, ActorUpdate, NewNotification, NewZone, Notification, Submission, SubmissionStatus,
    Zone, ZoneUpdate,
};

use super::Result;

/// Persistence for submissions and their line items.
///
/// Invariants the implementations must uphold:
/// - `insert` writes the submission and all items in one transaction;
///   a failure persists nothing.
/// - `delete` removes the submission and its items in one transaction;
///   no orphaned items survive.
/// - `set_status_if_pending` is a single conditional update, so two
///   concurrent moderators cannot both win.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a submission with its items atomically.
    async fn insert(&self, submission: &Submission) -> Result<()>;

    /// Fetch one submission with items.
    async fn fetch(&self, id: Uuid) -> Result<Option<Submission>>;

    /// All submissions, most recently collected first, ties in insertion
    /// order.
    async fn list_all(&self) -> Result<Vec<Submission>>;

    /// Submissions owned by one actor, same ordering as `list_all`.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Submission>>;

    /// Conditionally move a pending submission to `target`.
    ///
    /// Returns `true` when the row was pending and is now in `target`;
    /// `false` when the row was not pending (or does not exist). Implemented
    /// as `UPDATE .. WHERE status = 'pending'` so the transition is atomic
    /// at the storage layer.
    async fn set_status_if_pending(&self, id: Uuid, target: SubmissionStatus) -> Result<bool>;

    /// Delete a submission and cascade its items atomically.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Persistence for zones (hotspots).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ZoneStore: Send + Sync {
    async fn insert(&self, zone: &NewZone) -> Result<Zone>;
    async fn fetch(&self, id: Uuid) -> Result<Option<Zone>>;
    /// All zones ordered by name.
    async fn list(&self) -> Result<Vec<Zone>>;
    /// Apply a partial update; `None` when the zone does not exist.
    async fn update(&self, id: Uuid, update: ZoneUpdate) -> Result<Option<Zone>>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Directory of platform actors. Creation and credential management are
/// external identity concerns; this service reads and administers status.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ActorDirectory: Send + Sync {
    async fn fetch(&self, id: Uuid) -> Result<Option<Actor>>;
    /// All actors ordered by name.
    async fn list(&self) -> Result<Vec<Actor>>;
    /// Apply a status/assignment update; `None` when the actor does not
    /// exist.
    async fn update(&self, id: Uuid, update: ActorUpdate) -> Result<Option<Actor>>;
}

/// Persistence for notifications.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: &NewNotification) -> Result<Notification>;
    async fn fetch(&self, id: Uuid) -> Result<Option<Notification>>;
    /// Notifications visible to an actor: broadcasts plus their own.
    /// `None` lists everything (admin view). Newest first.
    async fn list_visible(&self, recipient_id: Option<Uuid>) -> Result<Vec<Notification>>;
    /// Returns whether a row was updated.
    async fn mark_read(&self, id: Uuid) -> Result<bool>;
}

/// Lookup of API tokens. Tokens are stored hashed; revoked tokens resolve to
/// nothing.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Resolve an active token hash to its actor.
    async fn actor_for_token(&self, token_hash: &str) -> Result<Option<Actor>>;
    /// Register a token hash for an actor.
    async fn register(&self, actor_id: Uuid, token_hash: &str) -> Result<()>;
    /// Deactivate a token hash.
    async fn revoke(&self, token_hash: &str) -> Result<()>;
}
