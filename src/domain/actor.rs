//! Actors: authenticated users of the platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Closed set of platform roles. Adding a role means extending the policy
/// table in `auth::policy`, not auditing call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    FieldOfficer,
    Partner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::FieldOfficer => "field_officer",
            Role::Partner => "partner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Role::SuperAdmin),
            "admin" => Some(Role::Admin),
            "field_officer" => Some(Role::FieldOfficer),
            "partner" => Some(Role::Partner),
            _ => None,
        }
    }

    /// Admin and super-admin share every moderation capability in scope.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account standing. Suspended actors may still authenticate but are denied
/// every data-mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(AccountStatus::Active),
            "suspended" => Some(AccountStatus::Suspended),
            _ => None,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An authenticated user. Created at registration (outside this service's
/// scope) and never hard-deleted; suspension is the only removal mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub organization: Option<String>,
    /// Zone this actor is assigned to work, if any. Informational for
    /// dispatch; it does not scope reads or writes.
    pub assigned_zone_id: Option<Uuid>,
}

/// Partial update applied by an administrator. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorUpdate {
    pub status: Option<AccountStatus>,
    pub assigned_zone_id: Option<Uuid>,
}
