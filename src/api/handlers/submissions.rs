//! Submission endpoints: create, list, read, moderate, delete.
//!
//! These are thin shells; every rule (ownership, suspension, state machine)
//! is enforced by the lifecycle manager.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::instrument;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{
    CreateSubmissionRequest, SubmissionResponse, TransitionRequest, TransitionResponse,
};
use crate::auth::ActorContextExt;
use crate::server::AppState;

/// GET /api/v1/submissions - submissions visible to the caller.
pub async fn list_submissions(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<SubmissionResponse>>, ApiError> {
    let submissions = state.lifecycle.list(&ctx).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/submissions - create a submission in state `pending`.
#[instrument(skip_all, fields(actor_id = %ctx.actor_id))]
pub async fn create_submission(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    let submission = state.lifecycle.create(&ctx, request.into()).await?;
    Ok((StatusCode::CREATED, Json(submission.into())))
}

/// GET /api/v1/submissions/:id
pub async fn get_submission(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let submission = state.lifecycle.get(&ctx, id).await?;
    Ok(Json(submission.into()))
}

/// PATCH /api/v1/submissions/:id/status - moderate to verified/rejected.
#[instrument(skip_all, fields(moderator = %ctx.actor_id, submission_id = %id))]
pub async fn transition_submission(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, ApiError> {
    let change = state.lifecycle.transition(&ctx, id, request.status).await?;
    Ok(Json(change.into()))
}

/// DELETE /api/v1/submissions/:id - owner only, pending/rejected only.
pub async fn delete_submission(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
