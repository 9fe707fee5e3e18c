//! PostgreSQL submission store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{GeoPoint, Submission, SubmissionItem, SubmissionStatus, ZoneRef};
use crate::infra::{CoreError, Result, SubmissionStore};

pub struct PgSubmissionStore {
    pool: PgPool,
}

impl PgSubmissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load items for a set of submissions in one round trip and attach
    /// them in place.
    async fn attach_items(&self, submissions: &mut [Submission]) -> Result<()> {
        if submissions.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = submissions.iter().map(|s| s.id).collect();
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, submission_id, material, weight_kg, bag_count
            FROM submission_items
            WHERE submission_id = ANY($1)
            ORDER BY seq ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            if let Some(submission) = submissions.iter_mut().find(|s| s.id == row.submission_id) {
                submission.items.push(SubmissionItem {
                    id: row.id,
                    submission_id: row.submission_id,
                    material: row.material,
                    weight_kg: row.weight_kg,
                    bag_count: row.bag_count,
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: &Submission) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO submissions (
                id, owner_id, zone_id, new_zone_name,
                gps_latitude, gps_longitude,
                status, notes, evidence_url, collected_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(submission.id)
        .bind(submission.owner_id)
        .bind(submission.zone.zone_id())
        .bind(submission.zone.proposed_name())
        .bind(submission.location.map(|p| p.latitude))
        .bind(submission.location.map(|p| p.longitude))
        .bind(submission.status.as_str())
        .bind(&submission.notes)
        .bind(&submission.evidence_url)
        .bind(submission.collected_at)
        .execute(&mut *tx)
        .await?;

        for item in &submission.items {
            sqlx::query(
                r#"
                INSERT INTO submission_items (id, submission_id, material, weight_kg, bag_count)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(item.id)
            .bind(submission.id)
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
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut submissions = vec![Submission::try_from(row)?];
                self.attach_items(&mut submissions).await?;
                Ok(submissions.pop())
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
            ORDER BY collected_at DESC, seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut submissions = rows
            .into_iter()
            .map(Submission::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.attach_items(&mut submissions).await?;
        Ok(submissions)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, owner_id, zone_id, new_zone_name,
                   gps_latitude, gps_longitude,
                   status, notes, evidence_url, collected_at
            FROM submissions
            WHERE owner_id = $1
            ORDER BY collected_at DESC, seq ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        let mut submissions = rows
            .into_iter()
            .map(Submission::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.attach_items(&mut submissions).await?;
        Ok(submissions)
    }

    async fn set_status_if_pending(&self, id: Uuid, target: SubmissionStatus) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE submissions SET status = $1 WHERE id = $2 AND status = 'pending'
            "#,
        )
        .bind(target.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM submission_items WHERE submission_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[derive(FromRow)]
struct SubmissionRow {
    id: Uuid,
    owner_id: Uuid,
    zone_id: Option<Uuid>,
    new_zone_name: Option<String>,
    gps_latitude: Option<f64>,
    gps_longitude: Option<f64>,
    status: String,
    notes: Option<String>,
    evidence_url: Option<String>,
    collected_at: DateTime<Utc>,
}

impl TryFrom<SubmissionRow> for Submission {
    type Error = CoreError;

    fn try_from(row: SubmissionRow) -> Result<Self> {
        let zone = ZoneRef::from_parts(row.zone_id, row.new_zone_name.as_deref()).ok_or_else(
            || CoreError::Internal(format!("submission {} has inconsistent zone columns", row.id)),
        )?;
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
            id: row.id,
            owner_id: row.owner_id,
            zone,
            location,
            status,
            notes: row.notes,
            evidence_url: row.evidence_url,
            collected_at: row.collected_at,
            items: Vec::new(),
        })
    }
}

#[derive(FromRow)]
struct ItemRow {
    id: Uuid,
    submission_id: Uuid,
    material: String,
    weight_kg: f64,
    bag_count: Option<i32>,
}
