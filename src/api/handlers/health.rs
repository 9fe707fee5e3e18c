//! Health endpoint.

use axum::Json;

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "reloop-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
