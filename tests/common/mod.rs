//! Common test utilities and fixtures for integration tests.
//!
//! Integration tests run hermetically against an in-memory SQLite database;
//! the Postgres suite in `postgres_test.rs` covers the production backend.

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use reloop_server::auth::{hash_token, ActorContext, AuthMiddlewareState, TokenValidator};
use reloop_server::domain::{AccountStatus, NewSubmission, NewSubmissionItem, Role};
use reloop_server::infra::{
    SqliteActorDirectory, SqliteNotificationStore, SqliteSubmissionStore, SqliteTokenStore,
    SqliteZoneStore, TokenStore,
};
use reloop_server::lifecycle::SubmissionLifecycle;
use reloop_server::server::AppState;

/// Field officer who owns most test submissions
pub fn officer_id() -> Uuid {
    Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap()
}

/// A second, unrelated field officer
pub fn other_officer_id() -> Uuid {
    Uuid::parse_str("22222222-2222-2222-2222-222222222222").unwrap()
}

pub fn admin_id() -> Uuid {
    Uuid::parse_str("33333333-3333-3333-3333-333333333333").unwrap()
}

pub fn partner_id() -> Uuid {
    Uuid::parse_str("44444444-4444-4444-4444-444444444444").unwrap()
}

pub fn suspended_officer_id() -> Uuid {
    Uuid::parse_str("55555555-5555-5555-5555-555555555555").unwrap()
}

/// Seeded zone every test can submit against
pub fn zone_id() -> Uuid {
    Uuid::parse_str("99999999-9999-9999-9999-999999999999").unwrap()
}

pub const OFFICER_TOKEN: &str = "rl_test_officer_0000000000000001";
pub const OTHER_OFFICER_TOKEN: &str = "rl_test_officer_0000000000000002";
pub const ADMIN_TOKEN: &str = "rl_test_admin_000000000000000001";
pub const PARTNER_TOKEN: &str = "rl_test_partner_0000000000000001";
pub const SUSPENDED_TOKEN: &str = "rl_test_suspended_00000000000001";

/// Create an in-memory SQLite pool with the schema applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    reloop_server::migrations::run_sqlite(&pool)
        .await
        .expect("migrations");
    pool
}

/// Seed the reference zone and the fixture actors.
pub async fn seed(pool: &SqlitePool) {
    sqlx::query(
        r#"
        INSERT INTO zones (id, name, description, latitude, longitude, status,
                           estimated_volume_kg, created_at)
        VALUES (?, 'Kipevu Creek', 'tidal accumulation point', -4.0435, 39.6682,
                'active', 120.0, '2025-01-01T00:00:00Z')
        "#,
    )
    .bind(zone_id().to_string())
    .execute(pool)
    .await
    .expect("seed zone");

    let actors = [
        (officer_id(), "Amina Odhiambo", "field_officer", "active"),
        (other_officer_id(), "Brian Mwangi", "field_officer", "active"),
        (admin_id(), "Carol Njeri", "admin", "active"),
        (partner_id(), "Coastal Recyclers Ltd", "partner", "active"),
        (
            suspended_officer_id(),
            "Daniel Otieno",
            "field_officer",
            "suspended",
        ),
    ];
    for (id, name, role, status) in actors {
        sqlx::query(
            r#"
            INSERT INTO actors (id, name, role, status) VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(name)
        .bind(role)
        .bind(status)
        .execute(pool)
        .await
        .expect("seed actor");
    }
}

/// Register the fixture bearer tokens.
pub async fn seed_tokens(pool: &SqlitePool) {
    let tokens = SqliteTokenStore::new(pool.clone());
    for (actor, token) in [
        (officer_id(), OFFICER_TOKEN),
        (other_officer_id(), OTHER_OFFICER_TOKEN),
        (admin_id(), ADMIN_TOKEN),
        (partner_id(), PARTNER_TOKEN),
        (suspended_officer_id(), SUSPENDED_TOKEN),
    ] {
        tokens
            .register(actor, &hash_token(token))
            .await
            .expect("register token");
    }
}

pub fn officer_ctx() -> ActorContext {
    ctx(officer_id(), Role::FieldOfficer, AccountStatus::Active)
}

pub fn other_officer_ctx() -> ActorContext {
    ctx(other_officer_id(), Role::FieldOfficer, AccountStatus::Active)
}

pub fn admin_ctx() -> ActorContext {
    ctx(admin_id(), Role::Admin, AccountStatus::Active)
}

pub fn partner_ctx() -> ActorContext {
    ctx(partner_id(), Role::Partner, AccountStatus::Active)
}

pub fn suspended_ctx() -> ActorContext {
    ctx(
        suspended_officer_id(),
        Role::FieldOfficer,
        AccountStatus::Suspended,
    )
}

fn ctx(actor_id: Uuid, role: Role, status: AccountStatus) -> ActorContext {
    ActorContext {
        actor_id,
        role,
        status,
        assigned_zone_id: None,
    }
}

/// A lifecycle manager over the SQLite submission store.
pub fn lifecycle(pool: &SqlitePool) -> SubmissionLifecycle {
    SubmissionLifecycle::new(Arc::new(SqliteSubmissionStore::new(pool.clone())))
}

/// Full application state over the SQLite backend.
pub fn app_state(pool: &SqlitePool) -> AppState {
    AppState {
        lifecycle: Arc::new(SubmissionLifecycle::new(Arc::new(
            SqliteSubmissionStore::new(pool.clone()),
        ))),
        zones: Arc::new(SqliteZoneStore::new(pool.clone())),
        actors: Arc::new(SqliteActorDirectory::new(pool.clone())),
        notifications: Arc::new(SqliteNotificationStore::new(pool.clone())),
        tokens: Arc::new(SqliteTokenStore::new(pool.clone())),
    }
}

/// Auth middleware state validating the fixture tokens.
pub fn auth_state(pool: &SqlitePool) -> AuthMiddlewareState {
    AuthMiddlewareState {
        validator: Arc::new(TokenValidator::new(Arc::new(SqliteTokenStore::new(
            pool.clone(),
        )))),
        require_auth: true,
    }
}

/// A valid submission input against the seeded zone.
pub fn pet_and_hdpe_submission() -> NewSubmission {
    NewSubmission {
        zone_id: Some(zone_id()),
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

/// Count the item rows stored for a submission id.
pub async fn item_rows(pool: &SqlitePool, submission_id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM submission_items WHERE submission_id = ?",
    )
    .bind(submission_id.to_string())
    .fetch_one(pool)
    .await
    .expect("count items")
}

/// Count all submission rows.
pub async fn submission_rows(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM submissions")
        .fetch_one(pool)
        .await
        .expect("count submissions")
}
