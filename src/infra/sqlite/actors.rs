//! SQLite actor directory.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, FromRow};
use uuid::Uuid;

use crate::domain::{AccountStatus, Actor, ActorUpdate, Role};
use crate::infra::{ActorDirectory, CoreError, Result};

use super::parse_uuid;

pub struct SqliteActorDirectory {
    pool: SqlitePool,
}

impl SqliteActorDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorDirectory for SqliteActorDirectory {
    async fn fetch(&self, id: Uuid) -> Result<Option<Actor>> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, role, status, organization, assigned_zone_id
            FROM actors
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Actor::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Actor>> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, role, status, organization, assigned_zone_id
            FROM actors
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Actor::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: ActorUpdate) -> Result<Option<Actor>> {
        let Some(mut actor) = self.fetch(id).await? else {
            return Ok(None);
        };

        if let Some(status) = update.status {
            actor.status = status;
        }
        if let Some(zone_id) = update.assigned_zone_id {
            actor.assigned_zone_id = Some(zone_id);
        }

        sqlx::query("UPDATE actors SET status = ?, assigned_zone_id = ? WHERE id = ?")
            .bind(actor.status.as_str())
            .bind(actor.assigned_zone_id.map(|z| z.to_string()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(Some(actor))
    }
}

#[derive(FromRow)]
struct ActorRow {
    id: String,
    name: String,
    role: String,
    status: String,
    organization: Option<String>,
    assigned_zone_id: Option<String>,
}

impl TryFrom<ActorRow> for Actor {
    type Error = CoreError;

    fn try_from(row: ActorRow) -> Result<Self> {
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
