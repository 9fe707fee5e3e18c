//! PostgreSQL notification store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{NewNotification, Notification, NotificationKind};
use crate::infra::{CoreError, NotificationStore, Result};

pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, new: &NewNotification) -> Result<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title.clone(),
            body: new.body.clone(),
            recipient_id: new.recipient_id,
            read: false,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO notifications (id, kind, title, body, recipient_id, read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id)
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.recipient_id)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, kind, title, body, recipient_id, read, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Notification::try_from).transpose()
    }

    async fn list_visible(&self, recipient_id: Option<Uuid>) -> Result<Vec<Notification>> {
        let rows = match recipient_id {
            Some(recipient) => {
                sqlx::query_as::<_, NotificationRow>(
                    r#"
                    SELECT id, kind, title, body, recipient_id, read, created_at
                    FROM notifications
                    WHERE recipient_id IS NULL OR recipient_id = $1
                    ORDER BY created_at DESC, seq DESC
                    "#,
                )
                .bind(recipient)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, NotificationRow>(
                    r#"
                    SELECT id, kind, title, body, recipient_id, read, created_at
                    FROM notifications
                    ORDER BY created_at DESC, seq DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: Uuid,
    kind: String,
    title: String,
    body: String,
    recipient_id: Option<Uuid>,
    read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = CoreError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Notification {
            id: row.id,
            kind: NotificationKind::parse(&row.kind).ok_or_else(|| {
                CoreError::Internal(format!("unknown notification kind: {}", row.kind))
            })?,
            title: row.title,
            body: row.body,
            recipient_id: row.recipient_id,
            read: row.read,
            created_at: row.created_at,
        })
    }
}
