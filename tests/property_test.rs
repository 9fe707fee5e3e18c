//! Property-based tests using proptest.
//!
//! These cover the invariants that must hold for any input: the moderation
//! state machine's edge set, the policy table, zone-reference consistency,
//! and conservation of weight through the read-side aggregation.

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;

use reloop_server::auth::policy::{authorize, Decision, Operation, Scope};
use reloop_server::auth::ActorContext;
use reloop_server::domain::reports::{material_totals, zone_volume_totals};
use reloop_server::domain::{
    AccountStatus, Role, Submission, SubmissionItem, SubmissionStatus, ZoneRef,
};

// ============================================================================
// Custom Strategies
// ============================================================================

fn arb_uuid() -> impl Strategy<Value = Uuid> {
    any::<[u8; 16]>().prop_map(Uuid::from_bytes)
}

fn arb_role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::Admin),
        Just(Role::FieldOfficer),
        Just(Role::Partner),
    ]
}

fn arb_account_status() -> impl Strategy<Value = AccountStatus> {
    prop_oneof![Just(AccountStatus::Active), Just(AccountStatus::Suspended)]
}

fn arb_submission_status() -> impl Strategy<Value = SubmissionStatus> {
    prop_oneof![
        Just(SubmissionStatus::Pending),
        Just(SubmissionStatus::Verified),
        Just(SubmissionStatus::Rejected),
    ]
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::ListSubmissions),
        Just(Operation::CreateSubmission),
        Just(Operation::TransitionSubmission),
        Just(Operation::DeleteSubmission),
        Just(Operation::ReadZones),
        Just(Operation::WriteZones),
        Just(Operation::ListActors),
        Just(Operation::MutateActor),
        Just(Operation::ReadNotifications),
        Just(Operation::CreateNotification),
        Just(Operation::MarkNotificationRead),
        Just(Operation::ReadReports),
    ]
}

fn arb_material() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("pet".to_string()),
        Just("hdpe".to_string()),
        Just("pp".to_string()),
        Just("ldpe".to_string()),
        "[a-z]{2,8}",
    ]
}

fn arb_items() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec((arb_material(), 0.0f64..500.0), 0..6)
}

fn arb_zone_ref() -> impl Strategy<Value = ZoneRef> {
    prop_oneof![
        arb_uuid().prop_map(ZoneRef::Existing),
        "[A-Za-z][A-Za-z ]{0,19}".prop_map(ZoneRef::Proposed),
    ]
}

fn make_submission(
    status: SubmissionStatus,
    zone: ZoneRef,
    items: Vec<(String, f64)>,
) -> Submission {
    let id = Uuid::new_v4();
    Submission {
        id,
        owner_id: Uuid::new_v4(),
        zone,
        location: None,
        status,
        notes: None,
        evidence_url: None,
        collected_at: Utc::now(),
        items: items
            .into_iter()
            .map(|(material, weight_kg)| SubmissionItem {
                id: Uuid::new_v4(),
                submission_id: id,
                material,
                weight_kg,
                bag_count: None,
            })
            .collect(),
    }
}

fn arb_submission() -> impl Strategy<Value = Submission> {
    (arb_submission_status(), arb_zone_ref(), arb_items())
        .prop_map(|(status, zone, items)| make_submission(status, zone, items))
}

fn ctx(role: Role, status: AccountStatus) -> ActorContext {
    ActorContext {
        actor_id: Uuid::new_v4(),
        role,
        status,
        assigned_zone_id: None,
    }
}

// ============================================================================
// State Machine Properties
// ============================================================================

proptest! {
    /// The only edges in the machine are pending -> verified and
    /// pending -> rejected.
    #[test]
    fn transition_edges_are_exactly_pending_to_terminal(
        from in arb_submission_status(),
        to in arb_submission_status(),
    ) {
        let expected = from == SubmissionStatus::Pending
            && (to == SubmissionStatus::Verified || to == SubmissionStatus::Rejected);
        prop_assert_eq!(from.can_transition_to(to), expected);
    }

    /// Deletability is exactly non-verified, and terminality is exactly
    /// non-pending; verified is the one state that is terminal and
    /// undeletable.
    #[test]
    fn verified_is_the_only_permanent_state(status in arb_submission_status()) {
        prop_assert_eq!(status.is_deletable(), status != SubmissionStatus::Verified);
        prop_assert_eq!(status.is_terminal(), status != SubmissionStatus::Pending);
    }
}

// ============================================================================
// Policy Table Properties
// ============================================================================

proptest! {
    /// No mutating operation is ever granted to a suspended account,
    /// whatever the role or resource ownership.
    #[test]
    fn suspended_accounts_never_mutate(
        role in arb_role(),
        op in arb_operation(),
        owner in proptest::option::of(arb_uuid()),
    ) {
        prop_assume!(op.is_mutating());
        let suspended = ctx(role, AccountStatus::Suspended);
        prop_assert!(!authorize(&suspended, op, owner).is_allowed());
    }

    /// Moderation is granted to admins and super-admins only.
    #[test]
    fn only_admins_moderate(role in arb_role(), status in arb_account_status()) {
        let decision = authorize(&ctx(role, status), Operation::TransitionSubmission, None);
        let expected = role.is_admin() && status == AccountStatus::Active;
        prop_assert_eq!(decision.is_allowed(), expected);
    }

    /// Submission creation is granted to active field officers only.
    #[test]
    fn only_field_officers_create(role in arb_role(), status in arb_account_status()) {
        let decision = authorize(&ctx(role, status), Operation::CreateSubmission, None);
        let expected = role == Role::FieldOfficer && status == AccountStatus::Active;
        prop_assert_eq!(decision.is_allowed(), expected);
    }

    /// Listing is always granted, own-scoped for field officers and
    /// system-wide for everyone else.
    #[test]
    fn list_scope_follows_role(role in arb_role(), status in arb_account_status()) {
        let decision = authorize(&ctx(role, status), Operation::ListSubmissions, None);
        let expected = if role == Role::FieldOfficer {
            Decision::Allow(Scope::Own)
        } else {
            Decision::Allow(Scope::All)
        };
        prop_assert_eq!(decision, expected);
    }

    /// Deletion never crosses ownership: an officer is denied for any
    /// resource owned by someone else, and non-officer roles are denied
    /// outright.
    #[test]
    fn delete_never_crosses_ownership(role in arb_role(), owner in arb_uuid()) {
        let caller = ctx(role, AccountStatus::Active);
        let decision = authorize(&caller, Operation::DeleteSubmission, Some(owner));
        // `owner` is freshly generated, so it never equals the caller's id.
        prop_assert!(!decision.is_allowed());
    }
}

// ============================================================================
// Zone Reference Properties
// ============================================================================

proptest! {
    /// `from_parts` yields a reference exactly when one side is set (and a
    /// proposed name is non-blank).
    #[test]
    fn zone_ref_requires_exactly_one_side(
        zone_id in proptest::option::of(arb_uuid()),
        name in proptest::option::of("[ ]{0,3}[A-Za-z]{0,12}[ ]{0,3}"),
    ) {
        let parsed = ZoneRef::from_parts(zone_id, name.as_deref());
        let has_name = name
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        match (zone_id, has_name) {
            (Some(id), false) => prop_assert_eq!(parsed, Some(ZoneRef::Existing(id))),
            (None, true) => {
                let expected = name.as_deref().unwrap().trim().to_string();
                prop_assert_eq!(parsed, Some(ZoneRef::Proposed(expected)));
            }
            _ => prop_assert_eq!(parsed, None),
        }
    }
}

// ============================================================================
// Aggregation Properties
// ============================================================================

proptest! {
    /// The derived total is the sum of the item weights.
    #[test]
    fn total_weight_is_the_item_sum(items in arb_items()) {
        let sub = make_submission(
            SubmissionStatus::Pending,
            ZoneRef::Existing(Uuid::new_v4()),
            items.clone(),
        );
        let expected: f64 = items.iter().map(|(_, w)| w).sum();
        prop_assert_eq!(sub.total_weight_kg(), expected);
    }

    /// Material totals conserve weight: summing every bucket gives the
    /// total verified weight, and nothing pending or rejected leaks in.
    #[test]
    fn material_totals_conserve_verified_weight(
        subs in prop::collection::vec(arb_submission(), 0..8),
    ) {
        let verified_weight: f64 = subs
            .iter()
            .filter(|s| s.status == SubmissionStatus::Verified)
            .map(|s| s.total_weight_kg())
            .sum();

        let totals = material_totals(&subs);
        let bucketed: f64 = totals.iter().map(|t| t.total_weight_kg).sum();
        prop_assert!((bucketed - verified_weight).abs() < 1e-6);

        // Heaviest-first ordering.
        for pair in totals.windows(2) {
            prop_assert!(pair[0].total_weight_kg >= pair[1].total_weight_kg);
        }
    }

    /// Zone totals count verified submissions against existing zones and
    /// nothing else.
    #[test]
    fn zone_totals_cover_verified_existing_zones(
        subs in prop::collection::vec(arb_submission(), 0..8),
    ) {
        let expected: f64 = subs
            .iter()
            .filter(|s| s.status == SubmissionStatus::Verified && s.zone.zone_id().is_some())
            .map(|s| s.total_weight_kg())
            .sum();

        let totals = zone_volume_totals(&subs);
        let summed: f64 = totals.values().sum();
        prop_assert!((summed - expected).abs() < 1e-6);
    }
}
