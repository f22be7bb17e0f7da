//! Serves blobs through locally signed pointers.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use dropcode_core::error::AppError;
use dropcode_storage::content_disposition;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/blobs/{signature}
pub async fn download_blob(
    State(state): State<AppState>,
    Path(signature): Path<String>,
) -> Result<Response, ApiError> {
    let blob = state.blob_store.open_signed(&signature).await?;

    let file_name = blob
        .download_name
        .as_deref()
        .or_else(|| blob.path.rsplit('/').next())
        .unwrap_or("file");

    let content_type = HeaderValue::from_str(&blob.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(file_name))
        .map_err(|e| AppError::internal(format!("Invalid download name: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        blob.data,
    )
        .into_response())
}
