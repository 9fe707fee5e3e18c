//! REST API routes for the collection platform.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::server::AppState;

use super::handlers::{actors, notifications, reports, submissions, zones};

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        // Submissions
        .route(
            "/v1/submissions",
            get(submissions::list_submissions).post(submissions::create_submission),
        )
        .route(
            "/v1/submissions/:id",
            get(submissions::get_submission).delete(submissions::delete_submission),
        )
        .route(
            "/v1/submissions/:id/status",
            patch(submissions::transition_submission),
        )
        // Zones
        .route("/v1/zones", get(zones::list_zones).post(zones::create_zone))
        .route(
            "/v1/zones/:id",
            patch(zones::update_zone).delete(zones::delete_zone),
        )
        // Actors
        .route("/v1/actors", get(actors::list_actors))
        .route("/v1/actors/:id", patch(actors::update_actor))
        // Notifications
        .route(
            "/v1/notifications",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route(
            "/v1/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        // Reports
        .route("/v1/reports/materials", get(reports::material_report))
        .route("/v1/reports/zones", get(reports::zone_volume_report))
}
