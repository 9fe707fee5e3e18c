//! Read-side aggregation endpoints.
//!
//! The figures are derived on read from the submissions visible to the
//! caller, through `domain::reports`. A field officer sees totals over
//! their own submissions; admins and partners see system-wide totals.

use axum::extract::{Extension, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ZoneVolumeResponse;
use crate::auth::policy::Operation;
use crate::auth::ActorContextExt;
use crate::domain::reports::{self, MaterialTotal};
use crate::server::AppState;

use super::require;

/// GET /api/v1/reports/materials - verified weight per material category.
pub async fn material_report(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<MaterialTotal>>, ApiError> {
    require(&ctx, Operation::ReadReports)?;
    let submissions = state.lifecycle.list(&ctx).await?;
    Ok(Json(reports::material_totals(&submissions)))
}

/// GET /api/v1/reports/zones - verified accumulated weight per zone.
pub async fn zone_volume_report(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<ZoneVolumeResponse>>, ApiError> {
    require(&ctx, Operation::ReadReports)?;
    let submissions = state.lifecycle.list(&ctx).await?;
    let totals = reports::zone_volume_totals(&submissions)
        .into_iter()
        .map(|(zone_id, verified_weight_kg)| ZoneVolumeResponse {
            zone_id,
            verified_weight_kg,
        })
        .collect();
    Ok(Json(totals))
}
