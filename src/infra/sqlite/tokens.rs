//! SQLite token store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, FromRow};
use uuid::Uuid;

use crate::domain::{AccountStatus, Actor, Role};
use crate::infra::{CoreError, Result, TokenStore};

use super::parse_uuid;

pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn actor_for_token(&self, token_hash: &str) -> Result<Option<Actor>> {
        let row = sqlx::query_as::<_, TokenActorRow>(
            r#"
            SELECT a.id, a.name, a.role, a.status, a.organization, a.assigned_zone_id
            FROM api_tokens t
            JOIN actors a ON a.id = t.actor_id
            WHERE t.token_hash = ? AND t.active = TRUE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Actor::try_from).transpose()
    }

    async fn register(&self, actor_id: Uuid, token_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO api_tokens (token_hash, actor_id, active, created_at)
            VALUES (?, ?, TRUE, ?)
            "#,
        )
        .bind(token_hash)
        .bind(actor_id.to_string())
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn revoke(&self, token_hash: &str) -> Result<()> {
        sqlx::query("UPDATE api_tokens SET active = FALSE WHERE token_hash = ?")
            .bind(token_hash)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct TokenActorRow {
    id: String,
    name: String,
    role: String,
    status: String,
    organization: Option<String>,
    assigned_zone_id: Option<String>,
}

impl TryFrom<TokenActorRow> for Actor {
    type Error = CoreError;

    fn try_from(row: TokenActorRow) -> Result<Self> {
        Ok(Actor {
            id: parse_uuid(&row.id, "actors.id")?,
            name: row.name,
            role: Role::parse(&row.role)
                .ok_or_else(|| CoreError::Internal(format!("unknown role: {}", row.role)))?,
            status: AccountStatus::parse(&row.status).ok_or_else(|| {
                CoreError::Internal(format!("unknown account status: {}", row.status))
            })?,
            organization: row.organization,
            assigned_zone_id: row
                .assigned_zone_id
                .as_deref()
                .map(|v| parse_uuid(v, "actors.assigned_zone_id"))
                .transpose()?,
        })
    }
}
