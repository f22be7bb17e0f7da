//! Share repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dropcode_core::error::{AppError, ErrorKind};
use dropcode_core::result::AppResult;
use dropcode_core::types::ShareId;
use dropcode_entity::share::{NewShare, Share};

use crate::store::ShareStore;

const SHARE_COLUMNS: &str = "id, short_code, token, kind, text_content, file_path, file_name, \
     content_type, created_at, expires_at, consumed_at";

/// PostgreSQL-backed share row store.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    fn backend(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn insert(&self, share: &NewShare) -> AppResult<Share> {
        let (file_path, file_name, content_type) = match &share.file {
            Some(f) => (
                Some(f.path.as_str()),
                Some(f.file_name.as_str()),
                Some(f.content_type.as_str()),
            ),
            None => (None, None, None),
        };

        sqlx::query_as::<_, Share>(&format!(
            "INSERT INTO shares (id, short_code, token, kind, text_content, file_path, \
             file_name, content_type, created_at, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {SHARE_COLUMNS}"
        ))
        .bind(share.id)
        .bind(share.short_code.as_i32())
        .bind(&share.token)
        .bind(share.kind)
        .bind(share.text_content.as_deref())
        .bind(file_path)
        .bind(file_name)
        .bind(content_type)
        .bind(share.created_at)
        .bind(share.expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, format!("Failed to create share: {e}"), e)
        })
    }

    async fn active_codes(&self, now: DateTime<Utc>) -> AppResult<Vec<i32>> {
        sqlx::query_scalar::<_, i32>(
            "SELECT short_code FROM shares WHERE expires_at > $1 AND consumed_at IS NULL",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to read active codes: {e}"),
                e,
            )
        })
    }

    async fn find_latest_by_code(&self, code: i32) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>(&format!(
            "SELECT {SHARE_COLUMNS} FROM shares WHERE short_code = $1 \
             ORDER BY created_at DESC LIMIT 1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to find share by code: {e}"),
                e,
            )
        })
    }

    async fn expired_file_paths(&self, now: DateTime<Utc>) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "SELECT file_path FROM shares \
             WHERE expires_at <= $1 AND file_path IS NOT NULL AND file_path <> ''",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to read expired shares: {e}"),
                e,
            )
        })
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM shares WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to delete expired shares: {e}"),
                    e,
                )
            })?;
        Ok(result.rows_affected())
    }

    async fn mark_consumed(&self, id: ShareId, at: DateTime<Utc>) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE shares SET consumed_at = $2 WHERE id = $1 AND consumed_at IS NULL")
                .bind(id)
                .bind(at)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        format!("Failed to mark share consumed: {e}"),
                        e,
                    )
                })?;
        Ok(result.rows_affected() > 0)
    }
}
