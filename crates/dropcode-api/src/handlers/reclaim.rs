//! Reclamation trigger handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ReclaimResponse;
use crate::error::ApiError;
use crate::extractors::ReclaimAuth;
use crate::state::AppState;

/// POST /api/reclaim
pub async fn reclaim(
    State(state): State<AppState>,
    _auth: ReclaimAuth,
) -> Result<Json<ReclaimResponse>, ApiError> {
    let report = state.reclaim_service.reclaim_now().await?;
    Ok(Json(report.into()))
}
