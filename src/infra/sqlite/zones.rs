//! SQLite zone store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{sqlite::SqlitePool, FromRow};
use uuid::Uuid;

use crate::domain::{NewZone, Zone, ZoneStatus, ZoneUpdate};
use crate::infra::{CoreError, Result, ZoneStore};

use super::{parse_timestamp, parse_uuid};

pub struct SqliteZoneStore {
    pool: SqlitePool,
}

impl SqliteZoneStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn write(&self, zone: &Zone) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE zones SET
                name = ?, description = ?, latitude = ?, longitude = ?,
                status = ?, estimated_volume_kg = ?, accessibility = ?, partner_notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&zone.name)
        .bind(&zone.description)
        .bind(zone.latitude)
        .bind(zone.longitude)
        .bind(zone.status.as_str())
        .bind(zone.estimated_volume_kg)
        .bind(&zone.accessibility)
        .bind(&zone.partner_notes)
        .bind(zone.id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ZoneStore for SqliteZoneStore {
    async fn insert(&self, new: &NewZone) -> Result<Zone> {
        let zone = Zone {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            description: new.description.clone(),
            latitude: new.latitude,
            longitude: new.longitude,
            status: new.status.unwrap_or(ZoneStatus::Active),
            estimated_volume_kg: new.estimated_volume_kg.unwrap_or(0.0),
            accessibility: new.accessibility.clone(),
            partner_notes: new.partner_notes.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO zones (
                id, name, description, latitude, longitude,
                status, estimated_volume_kg, accessibility, partner_notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(zone.id.to_string())
        .bind(&zone.name)
        .bind(&zone.description)
        .bind(zone.latitude)
        .bind(zone.longitude)
        .bind(zone.status.as_str())
        .bind(zone.estimated_volume_kg)
        .bind(&zone.accessibility)
        .bind(&zone.partner_notes)
        .bind(zone.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(zone)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Zone>> {
        let row = sqlx::query_as::<_, ZoneRow>(
            r#"
            SELECT id, name, description, latitude, longitude,
                   status, estimated_volume_kg, accessibility, partner_notes, created_at
            FROM zones
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Zone::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Zone>> {
        let rows = sqlx::query_as::<_, ZoneRow>(
            r#"
            SELECT id, name, description, latitude, longitude,
                   status, estimated_volume_kg, accessibility, partner_notes, created_at
            FROM zones
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Zone::try_from).collect()
    }

    async fn update(&self, id: Uuid, update: ZoneUpdate) -> Result<Option<Zone>> {
        let Some(mut zone) = self.fetch(id).await? else {
            return Ok(None);
        };
        zone.apply(update);
        self.write(&zone).await?;
        Ok(Some(zone))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM zones WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(FromRow)]
struct ZoneRow {
    id: String,
    name: String,
    description: Option<String>,
    latitude: f64,
    longitude: f64,
    status: String,
    estimated_volume_kg: f64,
    accessibility: Option<String>,
    partner_notes: Option<String>,
    created_at: String,
}

impl TryFrom<ZoneRow> for Zone {
    type Error = CoreError;

    fn try_from(row: ZoneRow) -> Result<Self> {
        Ok(Zone {
            id: parse_uuid(&row.id, "zones.id")?,
            name: row.name,
            description: row.description,
            latitude: row.latitude,
            longitude: row.longitude,
            status: ZoneStatus::parse(&row.status)
                .ok_or_else(|| CoreError::Internal(format!("unknown zone status: {}", row.status)))?,
            estimated_volume_kg: row.estimated_volume_kg,
            accessibility: row.accessibility,
            partner_notes: row.partner_notes,
            created_at: parse_timestamp(&row.created_at, "zones.created_at")?,
        })
    }
}
