//! Route handlers for the REST API.

pub mod actors;
pub mod health;
pub mod notifications;
pub mod reports;
pub mod submissions;
pub mod zones;

use crate::api::error::{forbidden, ApiError};
use crate::auth::policy::{authorize, Decision, DenyReason, Operation};
use crate::auth::ActorContext;
use crate::infra::CoreError;

/// Enforce a policy decision for operations handled outside the submission
/// lifecycle (zones, actors, notifications, reports).
pub(crate) fn require(ctx: &ActorContext, op: Operation) -> Result<(), ApiError> {
    match authorize(ctx, op, None) {
        Decision::Allow(_) => Ok(()),
        Decision::Deny(DenyReason::Suspended) => Err(ApiError::from(CoreError::Suspended)),
        Decision::Deny(_) => Err(forbidden("insufficient permissions for this operation")),
    }
}
