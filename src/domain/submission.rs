//! Collection submissions and their moderation lifecycle.
//!
//! A submission is one field-collected batch of waste material reported by a
//! field officer. It starts in `pending` and is moderated by an admin into
//! exactly one terminal state (`verified` or `rejected`). Terminal states are
//! never left again; a rejected submission may still be deleted by its owner
//! to allow resubmission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Moderation status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Awaiting moderation. The only state a submission is ever created in.
    Pending,
    /// Accepted by a moderator. Terminal; the submission becomes immutable.
    Verified,
    /// Declined by a moderator. Terminal, but the owner may delete it.
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Verified => "verified",
            SubmissionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(SubmissionStatus::Pending),
            "verified" => Some(SubmissionStatus::Verified),
            "rejected" => Some(SubmissionStatus::Rejected),
            _ => None,
        }
    }

    /// Whether this state admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionStatus::Verified | SubmissionStatus::Rejected)
    }

    /// The only edges in the machine are `pending -> verified` and
    /// `pending -> rejected`. Nothing re-enters `pending` and nothing
    /// leaves a terminal state.
    pub fn can_transition_to(&self, target: SubmissionStatus) -> bool {
        matches!(
            (self, target),
            (SubmissionStatus::Pending, SubmissionStatus::Verified)
                | (SubmissionStatus::Pending, SubmissionStatus::Rejected)
        )
    }

    /// A submission may be deleted by its owner while pending or after
    /// rejection. Verified submissions are permanent.
    pub fn is_deletable(&self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::Rejected)
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a submission was collected: either an existing zone, or a proposed
/// new zone awaiting admin review. Exactly one of the two, by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRef {
    Existing(Uuid),
    Proposed(String),
}

impl ZoneRef {
    /// Build a zone reference from the two optional wire fields. Returns
    /// `None` when neither or both are set.
    pub fn from_parts(zone_id: Option<Uuid>, new_zone_name: Option<&str>) -> Option<Self> {
        let name = new_zone_name.map(str::trim).filter(|n| !n.is_empty());
        match (zone_id, name) {
            (Some(id), None) => Some(ZoneRef::Existing(id)),
            (None, Some(name)) => Some(ZoneRef::Proposed(name.to_string())),
            _ => None,
        }
    }

    pub fn zone_id(&self) -> Option<Uuid> {
        match self {
            ZoneRef::Existing(id) => Some(*id),
            ZoneRef::Proposed(_) => None,
        }
    }

    pub fn proposed_name(&self) -> Option<&str> {
        match self {
            ZoneRef::Existing(_) => None,
            ZoneRef::Proposed(name) => Some(name),
        }
    }
}

/// GPS coordinates captured at collection time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One material-type/weight line within a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionItem {
    pub id: Uuid,
    pub submission_id: Uuid,
    /// Free-form material category, e.g. "pet", "hdpe", "pp".
    pub material: String,
    pub weight_kg: f64,
    pub bag_count: Option<i32>,
}

/// A field-collected batch of waste material, with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub zone: ZoneRef,
    pub location: Option<GeoPoint>,
    pub status: SubmissionStatus,
    pub notes: Option<String>,
    /// Opaque locator for the uploaded evidence image. The service never
    /// inspects the bytes behind it.
    pub evidence_url: Option<String>,
    pub collected_at: DateTime<Utc>,
    pub items: Vec<SubmissionItem>,
}

impl Submission {
    /// Derived total weight: the sum of item weights. Never stored.
    pub fn total_weight_kg(&self) -> f64 {
        self.items.iter().map(|i| i.weight_kg).sum()
    }
}

/// Input for creating a submission. The owning actor is never taken from the
/// payload; it always comes from the authenticated context.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSubmission {
    pub zone_id: Option<Uuid>,
    pub new_zone_name: Option<String>,
    pub location: Option<GeoPoint>,
    pub notes: Option<String>,
    pub evidence_url: Option<String>,
    pub items: Vec<NewSubmissionItem>,
}

impl NewSubmission {
    /// Resolve the mutually exclusive zone fields, if they are consistent.
    pub fn zone_ref(&self) -> Option<ZoneRef> {
        ZoneRef::from_parts(self.zone_id, self.new_zone_name.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubmissionItem {
    pub material: String,
    pub weight_kg: f64,
    pub bag_count: Option<i32>,
}

impl NewSubmissionItem {
    /// Weights must be finite and non-negative.
    pub fn has_valid_weight(&self) -> bool {
        self.weight_kg.is_finite() && self.weight_kg >= 0.0
    }
}
