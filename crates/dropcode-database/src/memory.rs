//! In-process share store.
//!
//! Backs tests and database-less local runs (`database.url = "memory://"`).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use dropcode_core::error::AppError;
use dropcode_core::result::AppResult;
use dropcode_core::types::ShareId;
use dropcode_entity::share::{NewShare, Share};

use crate::store::ShareStore;

/// Share rows held in a map behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryShareStore {
    rows: RwLock<HashMap<ShareId, Share>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently held, live or not.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    fn backend(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn insert(&self, share: &NewShare) -> AppResult<Share> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&share.id) {
            return Err(AppError::database(format!(
                "Share {} already exists",
                share.id
            )));
        }
        if rows.values().any(|row| row.token == share.token) {
            return Err(AppError::database("Share token already exists"));
        }
        let row = share.clone().into_share();
        rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn active_codes(&self, now: DateTime<Utc>) -> AppResult<Vec<i32>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| row.is_active(now))
            .map(|row| row.short_code)
            .collect())
    }

    async fn find_latest_by_code(&self, code: i32) -> AppResult<Option<Share>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| row.short_code == code)
            .max_by_key(|row| (row.created_at, row.id.into_uuid()))
            .cloned())
    }

    async fn expired_file_paths(&self, now: DateTime<Utc>) -> AppResult<Vec<String>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| row.is_expired(now))
            .filter_map(|row| row.blob_path().map(str::to_string))
            .collect())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, row| !row.is_expired(now));
        Ok((before - rows.len()) as u64)
    }

    async fn mark_consumed(&self, id: ShareId, at: DateTime<Utc>) -> AppResult<bool> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&id) {
            Some(row) if row.consumed_at.is_none() => {
                row.consumed_at = Some(at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
