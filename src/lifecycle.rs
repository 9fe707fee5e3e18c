//! The submission lifecycle manager.
//!
//! Owns every operation on submissions: create, list, read, moderate,
//! delete. Each operation consults the policy gate before touching storage,
//! so an unauthorized or suspended caller never reaches a write. Moderation
//! is executed as a conditional update at the storage layer; see
//! [`crate::infra::SubmissionStore::set_status_if_pending`].

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::policy::{authorize, Decision, DenyReason, Operation, Scope};
use crate::auth::ActorContext;
use crate::domain::{NewSubmission, Submission, SubmissionItem, SubmissionStatus};
use crate::infra::{CoreError, Result, SubmissionStore};

/// Outcome of a moderation call.
///
/// `newly_applied` is `false` when the submission was already in the target
/// state; repeating a moderation is a no-op, not an error.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub submission: Submission,
    pub newly_applied: bool,
}

pub struct SubmissionLifecycle {
    store: Arc<dyn SubmissionStore>,
}

impl SubmissionLifecycle {
    pub fn new(store: Arc<dyn SubmissionStore>) -> Self {
        Self { store }
    }

    /// Create a submission in state `pending`, owned by the calling actor.
    ///
    /// The owner always comes from the authenticated context; a client can
    /// never submit on another actor's behalf. Items persist atomically with
    /// the submission or not at all.
    pub async fn create(&self, ctx: &ActorContext, input: NewSubmission) -> Result<Submission> {
        gate(ctx, Operation::CreateSubmission, None, "only field officers may create submissions")?;

        let zone = input.zone_ref().ok_or_else(|| {
            CoreError::validation(
                "zone",
                "exactly one of zone_id or new_zone_name must be provided",
            )
        })?;

        for (idx, item) in input.items.iter().enumerate() {
            if item.material.trim().is_empty() {
                return Err(CoreError::validation(
                    format!("items[{idx}].material"),
                    "material must not be empty",
                ));
            }
            if !item.has_valid_weight() {
                return Err(CoreError::validation(
                    format!("items[{idx}].weight_kg"),
                    "weight must be a finite, non-negative number",
                ));
            }
        }

        let id = Uuid::new_v4();
        let submission = Submission {
            id,
            owner_id: ctx.actor_id,
            zone,
            location: input.location,
            status: SubmissionStatus::Pending,
            notes: input.notes,
            evidence_url: input.evidence_url,
            collected_at: Utc::now(),
            items: input
                .items
                .into_iter()
                .map(|item| SubmissionItem {
                    id: Uuid::new_v4(),
                    submission_id: id,
                    material: item.material,
                    weight_kg: item.weight_kg,
                    bag_count: item.bag_count,
                })
                .collect(),
        };

        self.store.insert(&submission).await?;
        info!(
            submission_id = %id,
            owner_id = %ctx.actor_id,
            item_count = submission.items.len(),
            "submission created"
        );
        Ok(submission)
    }

    /// List submissions visible to the actor, most recently collected first.
    pub async fn list(&self, ctx: &ActorContext) -> Result<Vec<Submission>> {
        match authorize(ctx, Operation::ListSubmissions, None) {
            Decision::Allow(Scope::All) => self.store.list_all().await,
            Decision::Allow(Scope::Own) => self.store.list_by_owner(ctx.actor_id).await,
            Decision::Deny(reason) => Err(deny_error(reason, "cannot list submissions")),
        }
    }

    /// Fetch a single submission, applying the same visibility rule as
    /// `list`: rows outside the actor's scope surface as not-found.
    pub async fn get(&self, ctx: &ActorContext, id: Uuid) -> Result<Submission> {
        let submission = self
            .store
            .fetch(id)
            .await?
            .ok_or_else(|| CoreError::not_found("submission", id))?;
        self.ensure_visible(ctx, &submission)?;
        Ok(submission)
    }

    /// Moderate a pending submission to `verified` or `rejected`.
    ///
    /// Terminal states are closed: nothing leaves them and nothing re-enters
    /// `pending`. Repeating a moderation the row already has reports
    /// `newly_applied = false` instead of failing, which keeps the API
    /// forgiving for double-submitted clicks.
    pub async fn transition(
        &self,
        ctx: &ActorContext,
        id: Uuid,
        target: SubmissionStatus,
    ) -> Result<StatusChange> {
        if target == SubmissionStatus::Pending {
            return Err(CoreError::validation(
                "status",
                "target status must be verified or rejected",
            ));
        }
        gate(
            ctx,
            Operation::TransitionSubmission,
            None,
            "only administrators may moderate submissions",
        )?;

        let current = self
            .store
            .fetch(id)
            .await?
            .ok_or_else(|| CoreError::not_found("submission", id))?;

        if current.status == target {
            return Ok(StatusChange {
                submission: current,
                newly_applied: false,
            });
        }
        if current.status != SubmissionStatus::Pending {
            return Err(CoreError::InvalidTransition {
                id,
                from: current.status,
                to: target,
            });
        }

        let applied = self.store.set_status_if_pending(id, target).await?;
        let now = self
            .store
            .fetch(id)
            .await?
            .ok_or_else(|| CoreError::not_found("submission", id))?;

        if applied {
            info!(submission_id = %id, status = %target, moderator = %ctx.actor_id, "submission moderated");
            return Ok(StatusChange {
                submission: now,
                newly_applied: true,
            });
        }

        // Lost a race with another moderator. If they picked the same
        // outcome this is still a success; otherwise the row is terminal in
        // a different state.
        if now.status == target {
            Ok(StatusChange {
                submission: now,
                newly_applied: false,
            })
        } else {
            Err(CoreError::InvalidTransition {
                id,
                from: now.status,
                to: target,
            })
        }
    }

    /// Delete a pending or rejected submission, owner only. Items are
    /// removed in the same transaction.
    pub async fn delete(&self, ctx: &ActorContext, id: Uuid) -> Result<()> {
        // Role-level check before the row is loaded so non-owning roles get
        // a definitive answer without probing for existence.
        gate(
            ctx,
            Operation::DeleteSubmission,
            None,
            "only the submitting field officer may delete a submission",
        )?;

        let submission = self
            .store
            .fetch(id)
            .await?
            .ok_or_else(|| CoreError::not_found("submission", id))?;

        match authorize(ctx, Operation::DeleteSubmission, Some(submission.owner_id)) {
            // Another officer's row is invisible under the own-only read
            // scope; do not reveal that it exists.
            Decision::Deny(DenyReason::NotOwner) => {
                return Err(CoreError::not_found("submission", id))
            }
            Decision::Deny(reason) => {
                return Err(deny_error(reason, "cannot delete this submission"))
            }
            Decision::Allow(_) => {}
        }

        if !submission.status.is_deletable() {
            return Err(CoreError::NotDeletable {
                id,
                status: submission.status,
            });
        }

        self.store.delete(id).await?;
        info!(submission_id = %id, owner_id = %ctx.actor_id, "submission deleted");
        Ok(())
    }

    fn ensure_visible(&self, ctx: &ActorContext, submission: &Submission) -> Result<()> {
        match authorize(ctx, Operation::ListSubmissions, None) {
            Decision::Allow(Scope::All) => Ok(()),
            Decision::Allow(Scope::Own) if submission.owner_id == ctx.actor_id => Ok(()),
            Decision::Allow(Scope::Own) => {
                Err(CoreError::not_found("submission", submission.id))
            }
            Decision::Deny(reason) => Err(deny_error(reason, "cannot read submissions")),
        }
    }
}

/// Enforce a policy decision, mapping denials onto core errors.
fn gate(
    ctx: &ActorContext,
    op: Operation,
    resource_owner: Option<Uuid>,
    message: &str,
) -> Result<()> {
    match authorize(ctx, op, resource_owner) {
        Decision::Allow(_) => Ok(()),
        Decision::Deny(reason) => Err(deny_error(reason, message)),
    }
}

fn deny_error(reason: DenyReason, message: &str) -> CoreError {
    match reason {
        DenyReason::Suspended => CoreError::Suspended,
        DenyReason::RoleForbidden | DenyReason::NotOwner => {
            CoreError::Authorization(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountStatus, Role, ZoneRef};
    use crate::infra::MockSubmissionStore;

    fn ctx(role: Role, status: AccountStatus) -> ActorContext {
        ActorContext {
            actor_id: Uuid::new_v4(),
            role,
            status,
            assigned_zone_id: None,
        }
    }

    fn pending_submission(id: Uuid, owner: Uuid) -> Submission {
        Submission {
            id,
            owner_id: owner,
            zone: ZoneRef::Existing(Uuid::new_v4()),
            location: None,
            status: SubmissionStatus::Pending,
            notes: None,
            evidence_url: None,
            collected_at: Utc::now(),
            items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn suspended_actor_is_rejected_before_any_store_call() {
        // No expectations: any store access would panic the mock.
        let store = MockSubmissionStore::new();
        let lifecycle = SubmissionLifecycle::new(Arc::new(store));

        let suspended = ctx(Role::FieldOfficer, AccountStatus::Suspended);
        let err = lifecycle
            .create(&suspended, NewSubmission::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Suspended));
    }

    #[tokio::test]
    async fn partner_cannot_moderate_regardless_of_row_state() {
        let store = MockSubmissionStore::new();
        let lifecycle = SubmissionLifecycle::new(Arc::new(store));

        let partner = ctx(Role::Partner, AccountStatus::Active);
        let err = lifecycle
            .transition(&partner, Uuid::new_v4(), SubmissionStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Authorization(_)));
    }

    #[tokio::test]
    async fn transition_to_pending_is_a_validation_error() {
        let store = MockSubmissionStore::new();
        let lifecycle = SubmissionLifecycle::new(Arc::new(store));

        let admin = ctx(Role::Admin, AccountStatus::Active);
        let err = lifecycle
            .transition(&admin, Uuid::new_v4(), SubmissionStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn losing_the_moderation_race_to_the_same_outcome_is_a_noop() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut store = MockSubmissionStore::new();
        let mut fetches = 0;
        store.expect_fetch().returning(move |_| {
            fetches += 1;
            let mut sub = pending_submission(id, owner);
            if fetches > 1 {
                // Second read observes the other moderator's write.
                sub.status = SubmissionStatus::Verified;
            }
            Ok(Some(sub))
        });
        store
            .expect_set_status_if_pending()
            .returning(|_, _| Ok(false));

        let lifecycle = SubmissionLifecycle::new(Arc::new(store));
        let admin = ctx(Role::Admin, AccountStatus::Active);
        let change = lifecycle
            .transition(&admin, id, SubmissionStatus::Verified)
            .await
            .unwrap();
        assert!(!change.newly_applied);
        assert_eq!(change.submission.status, SubmissionStatus::Verified);
    }

    #[tokio::test]
    async fn losing_the_race_to_the_other_outcome_is_an_invalid_transition() {
        let id = Uuid::new_v4();
        let owner = Uuid::new_v4();

        let mut store = MockSubmissionStore::new();
        let mut fetches = 0;
        store.expect_fetch().returning(move |_| {
            fetches += 1;
            let mut sub = pending_submission(id, owner);
            if fetches > 1 {
                sub.status = SubmissionStatus::Rejected;
            }
            Ok(Some(sub))
        });
        store
            .expect_set_status_if_pending()
            .returning(|_, _| Ok(false));

        let lifecycle = SubmissionLifecycle::new(Arc::new(store));
        let admin = ctx(Role::Admin, AccountStatus::Active);
        let err = lifecycle
            .transition(&admin, id, SubmissionStatus::Verified)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: SubmissionStatus::Rejected,
                to: SubmissionStatus::Verified,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_rejects_inconsistent_zone_fields_without_writing() {
        let store = MockSubmissionStore::new();
        let lifecycle = SubmissionLifecycle::new(Arc::new(store));
        let officer = ctx(Role::FieldOfficer, AccountStatus::Active);

        let neither = NewSubmission::default();
        assert!(matches!(
            lifecycle.create(&officer, neither).await.unwrap_err(),
            CoreError::Validation { .. }
        ));

        let both = NewSubmission {
            zone_id: Some(Uuid::new_v4()),
            new_zone_name: Some("somewhere".to_string()),
            ..NewSubmission::default()
        };
        assert!(matches!(
            lifecycle.create(&officer, both).await.unwrap_err(),
            CoreError::Validation { .. }
        ));
    }
}
