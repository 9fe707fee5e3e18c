//! Zones: named geographic waste-accumulation areas (hotspots).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneStatus {
    Active,
    Critical,
    Cleared,
}

impl ZoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneStatus::Active => "active",
            ZoneStatus::Critical => "critical",
            ZoneStatus::Cleared => "cleared",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(ZoneStatus::Active),
            "critical" => Some(ZoneStatus::Critical),
            "cleared" => Some(ZoneStatus::Cleared),
            _ => None,
        }
    }
}

impl fmt::Display for ZoneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named geographic area with accumulated-volume bookkeeping and optional
/// logistics metadata for recycler partners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ZoneStatus,
    /// Administratively maintained estimate. Read-side derivation from
    /// verified submissions lives in `domain::reports`.
    pub estimated_volume_kg: f64,
    /// How the site can be reached, e.g. "truck", "motorbike".
    pub accessibility: Option<String>,
    /// Free-form instructions for recycler partners.
    pub partner_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewZone {
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: Option<ZoneStatus>,
    pub estimated_volume_kg: Option<f64>,
    pub accessibility: Option<String>,
    pub partner_notes: Option<String>,
}

/// Partial update; absent fields are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<ZoneStatus>,
    pub estimated_volume_kg: Option<f64>,
    pub accessibility: Option<String>,
    pub partner_notes: Option<String>,
}

impl Zone {
    /// Apply a partial update in place.
    pub fn apply(&mut self, update: ZoneUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(latitude) = update.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = update.longitude {
            self.longitude = longitude;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(volume) = update.estimated_volume_kg {
            self.estimated_volume_kg = volume;
        }
        if let Some(accessibility) = update.accessibility {
            self.accessibility = Some(accessibility);
        }
        if let Some(notes) = update.partner_notes {
            self.partner_notes = Some(notes);
        }
    }
}
