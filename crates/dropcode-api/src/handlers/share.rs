//! Share create and view handlers.

use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};

use dropcode_core::error::AppError;
use dropcode_service::ResolveOutcome;

use crate::dto::request::CreateShareForm;
use crate::dto::response::{CreateShareResponse, ShareView};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CreateShareResponse>, ApiError> {
    let multipart =
        multipart.map_err(|_| AppError::validation("Expected multipart/form-data"))?;

    let form = CreateShareForm::from_multipart(multipart).await?;
    let ttl = form.ttl()?;
    let payload = form.into_payload()?;

    let created = state.share_service.create(payload, ttl).await?;

    Ok(Json(CreateShareResponse {
        code: created.code.get(),
        url: format!("{}/s/{}", state.config.server.base_url(), created.code),
        expires_at: created.expires_at,
    }))
}

/// GET /api/shares/{code}
///
/// Anything that is not an integer resolves as not found without a lookup.
pub async fn get_share(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ShareView>, ApiError> {
    let outcome = match code.trim().parse::<i64>() {
        Ok(code) => state.share_service.resolve(code).await?,
        Err(_) => ResolveOutcome::NotFound,
    };

    if !matches!(outcome, ResolveOutcome::Live(_)) {
        tracing::debug!(code = %code, outcome = ?outcome, "Share not served");
    }

    Ok(Json(outcome.into_result()?.into()))
}
