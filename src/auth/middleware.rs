//! Authentication middleware for Axum.
//!
//! Resolves the bearer token into an [`ActorContext`] and stores it in
//! request extensions for handlers to consume.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{ActorContext, AuthError, TokenValidator};

/// Actor context extension for request
#[derive(Clone)]
pub struct ActorContextExt(pub ActorContext);

/// Authentication middleware configuration/state.
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub validator: Arc<TokenValidator>,
    /// If false, unauthenticated requests run as the bootstrap admin
    /// (dev mode).
    pub require_auth: bool,
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AuthMiddlewareState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|header| header.strip_prefix("Bearer ").unwrap_or(header));

    let context = match token {
        Some(token) => match state.validator.validate(token).await {
            Ok(context) => context,
            Err(e) => {
                if state.require_auth {
                    return auth_error_response(e);
                }
                ActorContext::bootstrap_admin()
            }
        },
        None if state.require_auth => return auth_error_response(AuthError::MissingAuth),
        None => ActorContext::bootstrap_admin(),
    };

    request.extensions_mut().insert(ActorContextExt(context));
    next.run(request).await
}

/// Convert auth error to HTTP response
fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingAuth => (StatusCode::UNAUTHORIZED, "Missing authentication"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
        AuthError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed"),
    };

    (
        status,
        axum::Json(serde_json::json!({
            "error": {
                "message": message,
            }
        })),
    )
        .into_response()
}
