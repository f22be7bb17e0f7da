//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dropcode_service::{ReclaimReport, ResolvedShare};

/// Body of a successful `POST /api/shares`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareResponse {
    /// The allocated short code.
    pub code: u8,
    /// Public URL a receiver opens.
    pub url: String,
    /// When the share stops being served.
    pub expires_at: DateTime<Utc>,
}

/// Body of a successful `GET /api/shares/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShareView {
    /// Inline text.
    #[serde(rename_all = "camelCase")]
    Text {
        /// The text.
        content: String,
        /// When the share stops being served.
        expires_at: DateTime<Utc>,
    },
    /// A file behind a signed pointer.
    #[serde(rename_all = "camelCase")]
    File {
        /// Download name.
        file_name: String,
        /// Content type recorded at upload.
        content_type: String,
        /// Signed read pointer.
        signed_url: String,
        /// Pointer lifetime in seconds.
        expires_in_seconds: u64,
    },
}

impl From<ResolvedShare> for ShareView {
    fn from(share: ResolvedShare) -> Self {
        match share {
            ResolvedShare::Text {
                content,
                expires_at,
            } => Self::Text {
                content,
                expires_at,
            },
            ResolvedShare::File {
                file_name,
                content_type,
                signed_url,
                expires_in_seconds,
            } => Self::File {
                file_name,
                content_type,
                signed_url,
                expires_in_seconds,
            },
        }
    }
}

/// Body of a successful `POST /api/reclaim`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclaimResponse {
    /// Always true.
    pub ok: bool,
    /// Rows deleted.
    pub deleted_rows: u64,
    /// Blobs removed.
    pub removed_blobs: u64,
}

impl From<ReclaimReport> for ReclaimResponse {
    fn from(report: ReclaimReport) -> Self {
        Self {
            ok: true,
            deleted_rows: report.deleted_rows,
            removed_blobs: report.removed_blobs,
        }
    }
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
}

/// Readiness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    /// "ok" or "degraded".
    pub status: String,
    /// Row store backend and state.
    pub database: ComponentStatus,
    /// Blob store provider and state.
    pub storage: ComponentStatus,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Backend or provider name.
    pub backend: String,
    /// Whether the dependency answered its health check.
    pub healthy: bool,
}
