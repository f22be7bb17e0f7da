//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use crate::dto::response::{ComponentStatus, HealthResponse, ReadinessResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

/// GET /api/health/ready
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    let database = state.share_store.health_check().await.unwrap_or(false);
    let storage = state.blob_store.health_check().await.unwrap_or(false);
    let ready = database && storage;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if ready { "ok" } else { "degraded" }.to_string(),
            database: ComponentStatus {
                backend: state.share_store.backend().to_string(),
                healthy: database,
            },
            storage: ComponentStatus {
                backend: state.blob_store.provider_type().to_string(),
                healthy: storage,
            },
        }),
    )
}
