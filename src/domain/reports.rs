//! Read-side aggregation over submissions.
//!
//! Every derived figure the dashboards show (zone volume, material
//! composition) is computed here, in one place, from plain slices of domain
//! values. Nothing in this module performs I/O and nothing is recomputed at
//! write time; callers fetch submissions through their own scoping rules and
//! hand them in.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use super::submission::{Submission, SubmissionStatus};

/// Aggregated weight for one material category across verified submissions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialTotal {
    pub material: String,
    pub total_weight_kg: f64,
    pub item_count: usize,
}

/// Verified accumulated weight per existing zone.
///
/// Only verified submissions against an existing zone contribute; pending and
/// rejected batches, and proposals for not-yet-created zones, are excluded.
pub fn zone_volume_totals(submissions: &[Submission]) -> BTreeMap<Uuid, f64> {
    let mut totals = BTreeMap::new();
    for sub in verified(submissions) {
        if let Some(zone_id) = sub.zone.zone_id() {
            *totals.entry(zone_id).or_insert(0.0) += sub.total_weight_kg();
        }
    }
    totals
}

/// Material composition across verified submissions, heaviest first.
///
/// Material names are matched case-insensitively ("PET" and "pet" are the
/// same bucket) and reported lowercased.
pub fn material_totals(submissions: &[Submission]) -> Vec<MaterialTotal> {
    let mut buckets: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for sub in verified(submissions) {
        for item in &sub.items {
            let key = item.material.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }
            let entry = buckets.entry(key).or_insert((0.0, 0));
            entry.0 += item.weight_kg;
            entry.1 += 1;
        }
    }

    let mut totals: Vec<MaterialTotal> = buckets
        .into_iter()
        .map(|(material, (total_weight_kg, item_count))| MaterialTotal {
            material,
            total_weight_kg,
            item_count,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total_weight_kg
            .partial_cmp(&a.total_weight_kg)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    totals
}

fn verified(submissions: &[Submission]) -> impl Iterator<Item = &Submission> {
    submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Verified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::submission::{SubmissionItem, ZoneRef};
    use chrono::Utc;

    fn submission(
        status: SubmissionStatus,
        zone: ZoneRef,
        items: &[(&str, f64)],
    ) -> Submission {
        let id = Uuid::new_v4();
        Submission {
            id,
            owner_id: Uuid::new_v4(),
            zone,
            location: None,
            status,
            notes: None,
            evidence_url: None,
            collected_at: Utc::now(),
            items: items
                .iter()
                .map(|(material, weight)| SubmissionItem {
                    id: Uuid::new_v4(),
                    submission_id: id,
                    material: material.to_string(),
                    weight_kg: *weight,
                    bag_count: None,
                })
                .collect(),
        }
    }

    #[test]
    fn zone_totals_count_only_verified_existing_zones() {
        let zone = Uuid::new_v4();
        let subs = vec![
            submission(SubmissionStatus::Verified, ZoneRef::Existing(zone), &[("pet", 10.0)]),
            submission(SubmissionStatus::Verified, ZoneRef::Existing(zone), &[("hdpe", 5.0)]),
            submission(SubmissionStatus::Pending, ZoneRef::Existing(zone), &[("pet", 99.0)]),
            submission(
                SubmissionStatus::Verified,
                ZoneRef::Proposed("new beach".to_string()),
                &[("pp", 7.0)],
            ),
        ];

        let totals = zone_volume_totals(&subs);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[&zone], 15.0);
    }

    #[test]
    fn material_totals_merge_case_insensitively() {
        let zone = Uuid::new_v4();
        let subs = vec![
            submission(
                SubmissionStatus::Verified,
                ZoneRef::Existing(zone),
                &[("PET", 4.0), ("pet", 6.0), ("hdpe", 3.0)],
            ),
            submission(SubmissionStatus::Rejected, ZoneRef::Existing(zone), &[("pet", 50.0)]),
        ];

        let totals = material_totals(&subs);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].material, "pet");
        assert_eq!(totals[0].total_weight_kg, 10.0);
        assert_eq!(totals[0].item_count, 2);
        assert_eq!(totals[1].material, "hdpe");
        assert_eq!(totals[1].total_weight_kg, 3.0);
    }
}
