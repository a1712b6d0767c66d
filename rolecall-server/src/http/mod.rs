//! HTTP server module

mod api;
mod attempts;
mod reports;
mod share;
mod webhook;

use std::sync::Arc;

use axum::{
    Extension, Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::middleware::{AuthLayer, auth_middleware};

pub use api::HealthResponse;
pub use attempts::StartSessionResponse;
pub use share::{IssueShareRequest, IssueShareResponse};
pub use webhook::SIGNATURE_HEADER;

/// Create the HTTP router with all routes configured
///
/// The webhook route authenticates by signature, not identity, so it stays
/// outside the auth middleware.
pub fn create_router(state: Arc<AppState>, auth: AuthLayer) -> Router {
    let protected = Router::new()
        .route("/api/modules", get(share::list_modules))
        .route("/api/modules/:module_id/attempts", post(attempts::start_session))
        .route(
            "/api/modules/:module_id/share",
            post(share::issue).delete(share::revoke),
        )
        .route("/api/reports/:report_id", get(reports::get_report))
        .layer(middleware::from_fn(auth_middleware))
        .layer(Extension(auth));

    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/share/:token", get(share::resolve_token))
        .route("/webhooks/conversation/post-call", post(webhook::post_call))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
