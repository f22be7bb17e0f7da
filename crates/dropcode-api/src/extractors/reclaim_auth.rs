//! `ReclaimAuth` extractor: checks the bearer secret guarding reclamation.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use subtle::ConstantTimeEq;

use dropcode_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the request carried `Authorization: Bearer <reclaim secret>`.
#[derive(Debug, Clone, Copy)]
pub struct ReclaimAuth;

impl FromRequestParts<AppState> for ReclaimAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let secret = state
            .config
            .reclaim
            .secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::configuration("Reclaim secret not configured"))?;

        let presented = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        let expected = format!("Bearer {secret}");

        if bool::from(presented.ct_eq(expected.as_bytes())) {
            Ok(Self)
        } else {
            tracing::warn!("Rejected reclaim request with bad credentials");
            Err(AppError::unauthorized("Unauthorized").into())
        }
    }
}
