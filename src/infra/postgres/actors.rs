//! PostgreSQL actor directory.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{AccountStatus, Actor, ActorUpdate, Role};
use crate::infra::{ActorDirectory, CoreError, Result};

pub struct PgActorDirectory {
    pool: PgPool,
}

impl PgActorDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActorDirectory for PgActorDirectory {
    async fn fetch(&self, id: Uuid) -> Result<Option<Actor>> {
        let row = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name, role, status, organization, assigned_zone_id
            FROM actors
            WHERE id = $1
            "#,
        )
        .bind(id)
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

        sqlx::query("UPDATE actors SET status = $1, assigned_zone_id = $2 WHERE id = $3")
            .bind(actor.status.as_str())
            .bind(actor.assigned_zone_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Some(actor))
    }
}

#[derive(FromRow)]
struct ActorRow {
    id: Uuid,
    name: String,
    role: String,
    status: String,
    organization: Option<String>,
    assigned_zone_id: Option<Uuid>,
}

impl TryFrom<ActorRow> for Actor {
    type Error = CoreError;

    fn try_from(row: ActorRow) -> Result<Self> {
        Ok(Actor {
            id: row.id,
            name: row.name,
            role: Role::parse(&row.role)
                .ok_or_else(|| CoreError::Internal(format!("unknown role: {}", row.role)))?,
            status: AccountStatus::parse(&row.status).ok_or_else(|| {
                CoreError::Internal(format!("unknown account status: {}", row.status))
            })?,
            organization: row.organization,
            assigned_zone_id: row.assigned_zone_id,
        })
    }
}
