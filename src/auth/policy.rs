//! The access-control gate: one policy table for every role x operation.
//!
//! `authorize` is a pure function consulted before every core operation. The
//! suspended-account check runs first for anything mutating, then the role
//! table decides. Ownership scoping (a field officer touching someone else's
//! submission) is reported as a distinct deny reason so callers can map it to
//! not-found rather than forbidden and avoid leaking which rows exist.

use uuid::Uuid;

use super::ActorContext;
use crate::domain::Role;

/// Closed set of operations the gate knows about. A new capability means a
/// new variant here and one row in the table below, nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListSubmissions,
    CreateSubmission,
    TransitionSubmission,
    DeleteSubmission,
    ReadZones,
    WriteZones,
    ListActors,
    MutateActor,
    ReadNotifications,
    CreateNotification,
    MarkNotificationRead,
    ReadReports,
}

impl Operation {
    /// Operations the suspended-account gate applies to.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Operation::CreateSubmission
                | Operation::TransitionSubmission
                | Operation::DeleteSubmission
                | Operation::WriteZones
                | Operation::MutateActor
                | Operation::CreateNotification
                | Operation::MarkNotificationRead
        )
    }
}

/// How far a granted read extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every row system-wide.
    All,
    /// Only rows owned by the requesting actor.
    Own,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Account is suspended; all mutations are denied regardless of role.
    Suspended,
    /// The role never holds this capability.
    RoleForbidden,
    /// The role holds the capability only for its own resources, and the
    /// resource belongs to someone else.
    NotOwner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Scope),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Authorize `op` for the given actor context.
///
/// `resource_owner` is the owning actor of the targeted resource, when the
/// operation targets one (delete, mark-read). It is ignored for operations
/// that are not ownership-scoped.
pub fn authorize(ctx: &ActorContext, op: Operation, resource_owner: Option<Uuid>) -> Decision {
    use Decision::*;
    use DenyReason::*;
    use Operation::*;
    use Scope::*;

    if op.is_mutating() && ctx.is_suspended() {
        return Deny(Suspended);
    }

    match (ctx.role, op) {
        // Field officers work their own submissions and read shared data.
        (Role::FieldOfficer, ListSubmissions) => Allow(Own),
        (Role::FieldOfficer, CreateSubmission) => Allow(Own),
        (Role::FieldOfficer, DeleteSubmission) => own_only(ctx, resource_owner),
        (Role::FieldOfficer, ReadZones) => Allow(All),
        (Role::FieldOfficer, ReadNotifications) => Allow(Own),
        (Role::FieldOfficer, MarkNotificationRead) => own_only(ctx, resource_owner),
        (Role::FieldOfficer, ReadReports) => Allow(Own),
        (Role::FieldOfficer, _) => Deny(RoleForbidden),

        // Partners read everything, mutate nothing.
        (Role::Partner, ListSubmissions) => Allow(All),
        (Role::Partner, ReadZones) => Allow(All),
        (Role::Partner, ReadNotifications) => Allow(Own),
        (Role::Partner, MarkNotificationRead) => own_only(ctx, resource_owner),
        (Role::Partner, ReadReports) => Allow(All),
        (Role::Partner, _) => Deny(RoleForbidden),

        // Admins moderate and administer but do not submit or delete
        // field data; collection stays attributable to field officers.
        (Role::Admin | Role::SuperAdmin, CreateSubmission) => Deny(RoleForbidden),
        (Role::Admin | Role::SuperAdmin, DeleteSubmission) => Deny(RoleForbidden),
        (Role::Admin | Role::SuperAdmin, _) => Allow(All),
    }
}

fn own_only(ctx: &ActorContext, resource_owner: Option<Uuid>) -> Decision {
    match resource_owner {
        Some(owner) if owner == ctx.actor_id => Decision::Allow(Scope::Own),
        Some(_) => Decision::Deny(DenyReason::NotOwner),
        // No owner known yet; grant own-scope and let the caller re-check
        // once the resource is loaded.
        None => Decision::Allow(Scope::Own),
    }
}
