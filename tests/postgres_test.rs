//! Postgres-backed integration tests.
//!
//! These are ignored by default and are intended to run in CI (or locally)
//! with `DATABASE_URL` set: `cargo test --test postgres_test -- --ignored`.
//! Fixture rows use fresh UUIDs per run, so the suite can share a database.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use reloop_server::auth::ActorContext;
use reloop_server::domain::{
    AccountStatus, NewSubmission, NewSubmissionItem, Role, SubmissionStatus,
};
use reloop_server::infra::PgSubmissionStore;
use reloop_server::lifecycle::SubmissionLifecycle;
use reloop_server::{CoreError, SubmissionStore};

async fn connect_db() -> Option<sqlx::PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&url)
        .await
        .ok()?;
    Some(pool)
}

struct Fixture {
    officer: ActorContext,
    admin: ActorContext,
    zone_id: Uuid,
}

/// Seed an officer, an admin, and a zone with fresh ids.
async fn seed(pool: &sqlx::PgPool) -> Fixture {
    let officer_id = Uuid::new_v4();
    let admin_id = Uuid::new_v4();
    let zone_id = Uuid::new_v4();

    sqlx::query(
        "INSERT INTO zones (id, name, latitude, longitude) VALUES ($1, $2, $3, $4)",
    )
    .bind(zone_id)
    .bind(format!("pg-test-zone-{zone_id}"))
    .bind(-4.05)
    .bind(39.67)
    .execute(pool)
    .await
    .expect("seed zone");

    for (id, name, role) in [
        (officer_id, "pg-test-officer", "field_officer"),
        (admin_id, "pg-test-admin", "admin"),
    ] {
        sqlx::query("INSERT INTO actors (id, name, role, status) VALUES ($1, $2, $3, 'active')")
            .bind(id)
            .bind(name)
            .bind(role)
            .execute(pool)
            .await
            .expect("seed actor");
    }

    Fixture {
        officer: ActorContext {
            actor_id: officer_id,
            role: Role::FieldOfficer,
            status: AccountStatus::Active,
            assigned_zone_id: None,
        },
        admin: ActorContext {
            actor_id: admin_id,
            role: Role::Admin,
            status: AccountStatus::Active,
            assigned_zone_id: None,
        },
        zone_id,
    }
}

fn two_item_submission(zone_id: Uuid) -> NewSubmission {
    NewSubmission {
        zone_id: Some(zone_id),
        items: vec![
            NewSubmissionItem {
                material: "pet".to_string(),
                weight_kg: 10.5,
                bag_count: Some(3),
            },
            NewSubmissionItem {
                material: "hdpe".to_string(),
                weight_kg: 4.0,
                bag_count: None,
            },
        ],
        ..NewSubmission::default()
    }
}

async fn item_rows(pool: &sqlx::PgPool, submission_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM submission_items WHERE submission_id = $1",
    )
    .bind(submission_id)
    .fetch_one(pool)
    .await
    .expect("count items")
}

#[tokio::test]
#[ignore]
async fn postgres_lifecycle_round_trip() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    reloop_server::migrations::run_postgres(&pool).await.unwrap();

    let fixture = seed(&pool).await;
    let lifecycle =
        SubmissionLifecycle::new(Arc::new(PgSubmissionStore::new(pool.clone())));

    let created = lifecycle
        .create(&fixture.officer, two_item_submission(fixture.zone_id))
        .await
        .unwrap();
    assert_eq!(created.status, SubmissionStatus::Pending);
    assert_eq!(created.total_weight_kg(), 14.5);
    assert_eq!(item_rows(&pool, created.id).await, 2);

    // The owner sees the row through the scoped listing.
    let listed = lifecycle.list(&fixture.officer).await.unwrap();
    assert!(listed.iter().any(|s| s.id == created.id));

    // Verify, then repeat: the second call is a no-op, not an error.
    let first = lifecycle
        .transition(&fixture.admin, created.id, SubmissionStatus::Verified)
        .await
        .unwrap();
    assert!(first.newly_applied);
    let second = lifecycle
        .transition(&fixture.admin, created.id, SubmissionStatus::Verified)
        .await
        .unwrap();
    assert!(!second.newly_applied);
    assert_eq!(second.submission.status, SubmissionStatus::Verified);

    // The other terminal state is unreachable and the row is permanent.
    let err = lifecycle
        .transition(&fixture.admin, created.id, SubmissionStatus::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
    let err = lifecycle
        .delete(&fixture.officer, created.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotDeletable { .. }));

    // A rejected batch can be deleted by its owner, items included.
    let rejected = lifecycle
        .create(&fixture.officer, two_item_submission(fixture.zone_id))
        .await
        .unwrap();
    lifecycle
        .transition(&fixture.admin, rejected.id, SubmissionStatus::Rejected)
        .await
        .unwrap();
    lifecycle
        .delete(&fixture.officer, rejected.id)
        .await
        .unwrap();
    assert_eq!(item_rows(&pool, rejected.id).await, 0);
    assert!(lifecycle
        .list(&fixture.officer)
        .await
        .unwrap()
        .iter()
        .all(|s| s.id != rejected.id));
}

#[tokio::test]
#[ignore]
async fn postgres_conditional_update_guards_terminal_rows() {
    let Some(pool) = connect_db().await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };
    reloop_server::migrations::run_postgres(&pool).await.unwrap();

    let fixture = seed(&pool).await;
    let store = PgSubmissionStore::new(pool.clone());
    let lifecycle = SubmissionLifecycle::new(Arc::new(PgSubmissionStore::new(pool.clone())));

    let created = lifecycle
        .create(&fixture.officer, two_item_submission(fixture.zone_id))
        .await
        .unwrap();

    // First writer wins; a second conditional update touches nothing.
    assert!(store
        .set_status_if_pending(created.id, SubmissionStatus::Verified)
        .await
        .unwrap());
    assert!(!store
        .set_status_if_pending(created.id, SubmissionStatus::Rejected)
        .await
        .unwrap());

    let row = store.fetch(created.id).await.unwrap().unwrap();
    assert_eq!(row.status, SubmissionStatus::Verified);
}
