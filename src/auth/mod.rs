//! Authentication and authorization for the collection platform.
//!
//! # Authentication
//!
//! Requests carry an opaque bearer token. Tokens are stored SHA-256 hashed
//! and resolve to an [`ActorContext`] (id, role, account status, assigned
//! zone). Credential issuance for human login is an external identity
//! concern; this service only validates tokens it is handed.
//!
//! # Authorization
//!
//! A single pure policy table in [`policy`] maps role x operation to a
//! decision. The suspended-account gate is applied there, before the role
//! table, for every mutating operation. Handlers and the submission
//! lifecycle never compare role strings directly.
//!
//! # Configuration
//!
//! - `AUTH_MODE`: `required` (default) or `disabled` for development
//! - `BOOTSTRAP_ADMIN_TOKEN`: fixed super-admin token for initial setup

mod middleware;
pub mod policy;
mod token;

pub use middleware::*;
pub use token::*;

use uuid::Uuid;

use crate::domain::{AccountStatus, Actor, Role};

/// Authenticated actor context extracted from a request.
///
/// Always passed explicitly into core operations; nothing in the service
/// reads an ambient "current user".
#[derive(Debug, Clone, PartialEq)]
pub struct ActorContext {
    pub actor_id: Uuid,
    pub role: Role,
    pub status: AccountStatus,
    pub assigned_zone_id: Option<Uuid>,
}

impl ActorContext {
    pub fn is_suspended(&self) -> bool {
        self.status == AccountStatus::Suspended
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Context for the bootstrap super-admin token. Uses the nil UUID so it
    /// can never collide with (or own) real submissions.
    pub fn bootstrap_admin() -> Self {
        Self {
            actor_id: Uuid::nil(),
            role: Role::SuperAdmin,
            status: AccountStatus::Active,
            assigned_zone_id: None,
        }
    }
}

impl From<&Actor> for ActorContext {
    fn from(actor: &Actor) -> Self {
        Self {
            actor_id: actor.id,
            role: actor.role,
            status: actor.status,
            assigned_zone_id: actor.assigned_zone_id,
        }
    }
}

/// Authentication error
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing authentication")]
    MissingAuth,

    #[error("invalid token")]
    InvalidToken,

    #[error("token store error: {0}")]
    Store(String),
}
