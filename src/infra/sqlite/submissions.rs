//! SQLite submission store.

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, FromRow};
use uuid::Uuid;

use crate::domain::{GeoPoint, Submission, SubmissionItem, SubmissionStatus, ZoneRef};
use crate::infra::{CoreError, Result, SubmissionStore};

use super::{parse_timestamp, parse_uuid};

pub struct SqliteSubmissionStore {
    pool: SqlitePool,
}

impl SqliteSubmissionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, submission_id: &str) -> Result<Vec<SubmissionItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, submission_id, material, weight_kg, bag_count
            FROM submission_items
            WHERE submission_id = ?
            ORDER BY rowid ASC
            "#,
        )
        .bind(submission_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SubmissionItem::try_from).collect()
    }

    async fn rows_to_submissions(&self, rows: Vec<SubmissionRow>) -> Result<Vec<Submission>> {
        let mut submissions = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.load_items(&row.id).await?;
            let mut submission = Submission::try_from(row)?;
            submission.items = items;
            submissions.push(submission);
        }
        Ok(submissions)
    }
}

#[async_trait]
impl SubmissionStore for SqliteSubmissionStore {
    async fn insert(&self, submission: &Submission) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, owner_id, zone_id, new_zone_name,
                gps_latitude, gps_longitude,
                status, notes, evidence_url, collected_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(submission.id.to_string())
        .bind(submission.owner_id.to_string())
        .bind(submission.zone.zone_id().map(|id| id.to_string()))
        .bind(submission.zone.proposed_name())
        .bind(submission.location.map(|p| p.latitude))
        .bind(submission.location.map(|p| p.longitude))
        .bind(submission.status.as_str())
        .bind(&submission.notes)
        .bind(&submission.evidence_url)
        .bind(submission.collected_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for item in &submission.items {
            sqlx::query(
                r#"
                INSERT INTO submission_items (id, submission_id, material, weight_kg, bag_count)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(item.id.to_string())
            .bind(submission.id.to_string())
            .bind(&item.material)
            .bind(item.weight_kg)
            .bind(item.bag_count)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Submission>> {
        let row = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, owner_id, zone_id, new_zone_name,
                   gps_latitude, gps_longitude,
                   status, notes, evidence_url, collected_at
            FROM submissions
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.load_items(&row.id).await?;
                let mut submission = Submission::try_from(row)?;
                submission.items = items;
                Ok(Some(submission))
            }
            None => Ok(None),
        }
    }

    async fn list_all(&self) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, owner_id, zone_id, new_zone_name,
                   gps_latitude, gps_longitude,
                   status, notes, evidence_url, collected_at
            FROM submissions
            ORDER BY collected_at DESC, rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_submissions(rows).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, owner_id, zone_id, new_zone_name,
                   gps_latitude, gps_longitude,
                   status, notes, evidence_url, collected_at
            FROM submissions
            WHERE owner_id = ?
            ORDER BY collected_at DESC, rowid ASC
            "#,
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_submissions(rows).await
    }

    async fn set_status_if_pending(&self, id: Uuid, target: SubmissionStatus) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE submissions SET status = ? WHERE id = ? AND status = 'pending'
            "#,
        )
        .bind(target.as_str())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submission_items WHERE submission_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM submissions WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct SubmissionRow {
    id: String,
    owner_id: String,
    zone_id: Option<String>,
    new_zone_name: Option<String>,
    gps_latitude: Option<f64>,
    gps_longitude: Option<f64>,
    status: String,
    notes: Option<String>,
    evidence_url: Option<String>,
    collected_at: String,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = CoreError;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        let zone_id = row
            .zone_id
            .as_deref()
            .map(|v| parse_uuid(v, "submissions.zone_id"))
            .transpose()?;
        let zone = ZoneRef::from_parts(zone_id, row.new_zone_name.as_deref()).ok_or_else(|| {
            CoreError::Internal(format!("submission {} has inconsistent zone columns", row.id))
        })?;
        let status = SubmissionStatus::parse(&row.status).ok_or_else(|| {
            CoreError::Internal(format!("unknown submission status: {}", row.status))
        })?;
        let location = match (row.gps_latitude, row.gps_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Ok(Submission {
            id: parse_uuid(&row.id, "submissions.id")?,
            owner_id: parse_uuid(&row.owner_id, "submissions.owner_id")?,
            zone,
            location,
            status,
            notes: row.notes,
            evidence_url: row.evidence_url,
            collected_at: parse_timestamp(&row.collected_at, "submissions.collected_at")?,
            items: Vec::new(),
        })
    }
}

#[derive(FromRow)]
struct ItemRow {
    id: String,
    submission_id: String,
    material: String,
    weight_kg: f64,
    bag_count: Option<i32>,
}

impl TryFrom<ItemRow> for SubmissionItem {
    type Error = CoreError;

    fn try_from(row: ItemRow) -> Result<Self> {
        Ok(SubmissionItem {
            id: parse_uuid(&row.id, "submission_items.id")?,
            submission_id: parse_uuid(&row.submission_id, "submission_items.submission_id")?,
            material: row.material,
            weight_kg: row.weight_kg,
            bag_count: row.bag_count,
        })
    }
}
