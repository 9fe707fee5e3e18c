//! Notification endpoints: broadcasts and targeted messages.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::error::{not_found, ApiError};
use crate::api::types::{CreateNotificationRequest, NotificationResponse};
use crate::auth::policy::{authorize, Decision, DenyReason, Operation, Scope};
use crate::auth::ActorContextExt;
use crate::infra::CoreError;
use crate::server::AppState;

use super::require;

/// GET /api/v1/notifications - broadcasts plus the caller's own; admins see
/// everything.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let recipient = match authorize(&ctx, Operation::ReadNotifications, None) {
        Decision::Allow(Scope::All) => None,
        Decision::Allow(Scope::Own) => Some(ctx.actor_id),
        Decision::Deny(_) => {
            return Err(crate::api::error::forbidden("cannot read notifications"))
        }
    };
    let notifications = state.notifications.list_visible(recipient).await?;
    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/notifications - admin only.
pub async fn create_notification(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), ApiError> {
    require(&ctx, Operation::CreateNotification)?;
    let notification = state.notifications.insert(&request.into()).await?;
    Ok((StatusCode::CREATED, Json(notification.into())))
}

/// POST /api/v1/notifications/:id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(ActorContextExt(ctx)): Extension<ActorContextExt>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let notification = state
        .notifications
        .fetch(id)
        .await?
        .ok_or_else(|| not_found("notification", id))?;

    match authorize(
        &ctx,
        Operation::MarkNotificationRead,
        notification.recipient_id,
    ) {
        Decision::Allow(_) => {}
        // Someone else's notification is not visible to this caller.
        Decision::Deny(DenyReason::NotOwner) => return Err(not_found("notification", id)),
        Decision::Deny(DenyReason::Suspended) => {
            return Err(ApiError::from(CoreError::Suspended))
        }
        Decision::Deny(_) => {
            return Err(crate::api::error::forbidden("cannot mark this notification"))
        }
    }

    state.notifications.mark_read(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
