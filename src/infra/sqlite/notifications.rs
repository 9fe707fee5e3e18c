//! SQLite notification store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, FromRow};
use uuid::Uuid;

use crate::domain::{NewNotification, Notification, NotificationKind};
use crate::infra::{CoreError, NotificationStore, Result};

use super::{parse_timestamp, parse_uuid};

pub struct SqliteNotificationStore {
    pool: SqlitePool,
}

impl SqliteNotificationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for SqliteNotificationStore {
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
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(notification.id.to_string())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(notification.recipient_id.map(|id| id.to_string()))
        .bind(notification.read)
        .bind(notification.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(notification)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT id, kind, title, body, recipient_id, read, created_at
            FROM notifications
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
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
                    WHERE recipient_id IS NULL OR recipient_id = ?
                    ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .bind(recipient.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, NotificationRow>(
                    r#"
                    SELECT id, kind, title, body, recipient_id, read, created_at
                    FROM notifications
                    ORDER BY created_at DESC, rowid DESC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_read(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(FromRow)]
struct NotificationRow {
    id: String,
    kind: String,
    title: String,
    body: String,
    recipient_id: Option<String>,
    read: bool,
    created_at: String,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = CoreError;

    fn try_from(row: NotificationRow) -> Result<Self> {
        Ok(Notification {
            id: parse_uuid(&row.id, "notifications.id")?,
            kind: NotificationKind::parse(&row.kind).ok_or_else(|| {
                CoreError::Internal(format!("unknown notification kind: {}", row.kind))
            })?,
            title: row.title,
            body: row.body,
            recipient_id: row
                .recipient_id
                .as_deref()
                .map(|v| parse_uuid(v, "notifications.recipient_id"))
                .transpose()?,
            read: row.read,
            created_at: parse_timestamp(&row.created_at, "notifications.created_at")?,
        })
    }
}
