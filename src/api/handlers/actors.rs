//! Actor administration endpoints. Admin and super-admin only.

use axum::extract::{Extension, Path, State};
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::api::error::{not_found, ApiError};
use crate::api::types::ActorResponse;
use crate::auth::policy::Operation;
use crate::auth::ActorContextExt;
use crate::domain::ActorUpdate;
use crate::server::AppState;

use super::require;

/// GET /api/v1/actors
pub async fn list_actors(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<ActorResponse>>, ApiError> {
    require(&ctx, Operation::ListActors)?;
    let actors = state.actors.list().await?;
    Ok(Json(actors.into_iter().map(Into::into).collect()))
}

/// PATCH /api/v1/actors/:id - update account status or zone assignment.
///
/// Suspension takes effect on the target's next authenticated request.
#[instrument(skip_all, fields(admin = %ctx.actor_id, actor_id = %id))]
pub async fn update_actor(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActorUpdate>,
) -> Result<Json<ActorResponse>, ApiError> {
    require(&ctx, Operation::MutateActor)?;
    let actor = state
        .actors
        .update(id, request)
        .await?
        .ok_or_else(|| not_found("actor", id))?;
    Ok(Json(actor.into()))
}
