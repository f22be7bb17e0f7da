//! Route definitions for the Dropcode HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to every handler via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use dropcode_entity::share::MAX_FILE_BYTES;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart framing and the other form fields.
const BODY_HEADROOM_BYTES: usize = 1024 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(blob_routes())
        .merge(reclaim_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_FILE_BYTES + BODY_HEADROOM_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Share create and view
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", post(handlers::share::create_share))
        .route("/shares/{code}", get(handlers::share::get_share))
}

/// Signed pointer downloads
fn blob_routes() -> Router<AppState> {
    Router::new().route("/blobs/{signature}", get(handlers::blob::download_blob))
}

/// Reclamation trigger
fn reclaim_routes() -> Router<AppState> {
    Router::new().route("/reclaim", post(handlers::reclaim::reclaim))
}

/// Liveness and readiness
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::readiness))
}
