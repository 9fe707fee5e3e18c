//! Zone (hotspot) endpoints. Read for every role, write for admins.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::{not_found, ApiError};
use crate::api::types::ZoneResponse;
use crate::auth::policy::Operation;
use crate::auth::ActorContextExt;
use crate::domain::{NewZone, ZoneUpdate};
use crate::server::AppState;

use super::require;

/// GET /api/v1/zones
pub async fn list_zones(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<ZoneResponse>>, ApiError> {
    require(&ctx, Operation::ReadZones)?;
    let zones = state.zones.list().await?;
    Ok(Json(zones.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/zones
pub async fn create_zone(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Json(request): Json<NewZone>,
) -> Result<(StatusCode, Json<ZoneResponse>), ApiError> {
    require(&ctx, Operation::WriteZones)?;
    let zone = state.zones.insert(&request).await?;
    Ok((StatusCode::CREATED, Json(zone.into())))
}

/// PATCH /api/v1/zones/:id
pub async fn update_zone(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
    Json(request): Json<ZoneUpdate>,
) -> Result<Json<ZoneResponse>, ApiError> {
    require(&ctx, Operation::WriteZones)?;
    let zone = state
        .zones
        .update(id, request)
        .await?
        .ok_or_else(|| not_found("zone", id))?;
    Ok(Json(zone.into()))
}

/// DELETE /api/v1/zones/:id
pub async fn delete_zone(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require(&ctx, Operation::WriteZones)?;
    if !state.zones.delete(id).await? {
        return Err(not_found("zone", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
