//! Request/response DTOs for the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AccountStatus, Actor, GeoPoint, NewNotification, NewSubmission, NewSubmissionItem,
    Notification, NotificationKind, Role, Submission, SubmissionStatus, Zone, ZoneStatus,
};
use crate::lifecycle::StatusChange;

// ============================================================================
// Submissions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    pub zone_id: Option<Uuid>,
    pub new_zone_name: Option<String>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub notes: Option<String>,
    pub evidence_url: Option<String>,
    #[serde(default)]
    pub items: Vec<SubmissionItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionItemRequest {
    pub material: String,
    pub weight_kg: f64,
    pub bag_count: Option<i32>,
}

impl From<CreateSubmissionRequest> for NewSubmission {
    fn from(req: CreateSubmissionRequest) -> Self {
        let location = match (req.gps_latitude, req.gps_longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        };
        NewSubmission {
            zone_id: req.zone_id,
            new_zone_name: req.new_zone_name,
            location,
            notes: req.notes,
            evidence_url: req.evidence_url,
            items: req
                .items
                .into_iter()
                .map(|item| NewSubmissionItem {
                    material: item.material,
                    weight_kg: item.weight_kg,
                    bag_count: item.bag_count,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub zone_id: Option<Uuid>,
    pub new_zone_name: Option<String>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    pub evidence_url: Option<String>,
    pub collected_at: DateTime<Utc>,
    pub items: Vec<SubmissionItemResponse>,
    /// Derived, never stored.
    pub total_weight_kg: f64,
}

#[derive(Debug, Serialize)]
pub struct SubmissionItemResponse {
    pub id: Uuid,
    pub material: String,
    pub weight_kg: f64,
    pub bag_count: Option<i32>,
}

impl From<Submission> for SubmissionResponse {
    fn from(sub: Submission) -> Self {
        let total_weight_kg = sub.total_weight_kg();
        Self {
            id: sub.id,
            owner_id: sub.owner_id,
            zone_id: sub.zone.zone_id(),
            new_zone_name: sub.zone.proposed_name().map(str::to_string),
            gps_latitude: sub.location.map(|p| p.latitude),
            gps_longitude: sub.location.map(|p| p.longitude),
            status: sub.status,
            notes: sub.notes,
            evidence_url: sub.evidence_url,
            collected_at: sub.collected_at,
            items: sub
                .items
                .into_iter()
                .map(|item| SubmissionItemResponse {
                    id: item.id,
                    material: item.material,
                    weight_kg: item.weight_kg,
                    bag_count: item.bag_count,
                })
                .collect(),
            total_weight_kg,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    pub status: SubmissionStatus,
}

#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub submission: SubmissionResponse,
    /// `false` when the submission was already in the requested state.
    pub newly_applied: bool,
}

impl From<StatusChange> for TransitionResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            submission: change.submission.into(),
            newly_applied: change.newly_applied,
        }
    }
}

// ============================================================================
// Zones
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ZoneResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ZoneStatus,
    pub estimated_volume_kg: f64,
    pub accessibility: Option<String>,
    pub partner_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Zone> for ZoneResponse {
    fn from(zone: Zone) -> Self {
        Self {
            id: zone.id,
            name: zone.name,
            description: zone.description,
            latitude: zone.latitude,
            longitude: zone.longitude,
            status: zone.status,
            estimated_volume_kg: zone.estimated_volume_kg,
            accessibility: zone.accessibility,
            partner_notes: zone.partner_notes,
            created_at: zone.created_at,
        }
    }
}

// ============================================================================
// Actors
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ActorResponse {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub status: AccountStatus,
    pub organization: Option<String>,
    pub assigned_zone_id: Option<Uuid>,
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            role: actor.role,
            status: actor.status,
            organization: actor.organization,
            assigned_zone_id: actor.assigned_zone_id,
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub recipient_id: Option<Uuid>,
}

impl From<CreateNotificationRequest> for NewNotification {
    fn from(req: CreateNotificationRequest) -> Self {
        Self {
            kind: req.kind,
            title: req.title,
            body: req.body,
            recipient_id: req.recipient_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub recipient_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            kind: n.kind,
            title: n.title,
            body: n.body,
            recipient_id: n.recipient_id,
            read: n.read,
            created_at: n.created_at,
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ZoneVolumeResponse {
    pub zone_id: Uuid,
    pub verified_weight_kg: f64,
}
