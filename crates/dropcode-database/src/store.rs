//! The row store contract the share lifecycle runs against.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use dropcode_core::result::AppResult;
use dropcode_core::types::ShareId;
use dropcode_entity::share::{NewShare, Share};

/// Operations over the `shares` table.
///
/// Every method is a single statement; no method spans a transaction.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short name of the backend, for logs and readiness output.
    fn backend(&self) -> &str;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Insert one row and return it as stored.
    async fn insert(&self, share: &NewShare) -> AppResult<Share>;

    /// Codes held by active rows (`expires_at > now AND consumed_at IS NULL`).
    async fn active_codes(&self, now: DateTime<Utc>) -> AppResult<Vec<i32>>;

    /// The most recently created row with `code`, in any state.
    async fn find_latest_by_code(&self, code: i32) -> AppResult<Option<Share>>;

    /// Blob paths of rows whose `expires_at <= now`.
    async fn expired_file_paths(&self, now: DateTime<Utc>) -> AppResult<Vec<String>>;

    /// Delete every row whose `expires_at <= now`, returning the exact count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Set `consumed_at` if it is still unset. Returns whether a row changed.
    async fn mark_consumed(&self, id: ShareId, at: DateTime<Utc>) -> AppResult<bool>;
}
