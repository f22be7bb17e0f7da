//! Reclamation of expired shares.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use dropcode_core::result::AppResult;
use dropcode_core::traits::{BlobStore, Clock};
use dropcode_database::ShareStore;

/// Outcome of one reclamation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclaimReport {
    /// Rows deleted.
    pub deleted_rows: u64,
    /// Blobs removed; zero when the removal batch failed.
    pub removed_blobs: u64,
}

/// Deletes expired rows and their blobs.
#[derive(Debug, Clone)]
pub struct ReclaimService {
    store: Arc<dyn ShareStore>,
    blobs: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl ReclaimService {
    /// Creates a new reclaim service.
    pub fn new(
        store: Arc<dyn ShareStore>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            blobs,
            clock,
        }
    }

    /// Reclaim everything expired as of the service clock.
    pub async fn reclaim_now(&self) -> AppResult<ReclaimReport> {
        self.reclaim(self.clock.now()).await
    }

    /// Reclaim every share whose `expires_at <= now`, consumed or not.
    ///
    /// A failed blob batch is logged and reported as zero removed blobs; the
    /// rows are deleted regardless. Safe to run concurrently and repeatedly.
    pub async fn reclaim(&self, now: DateTime<Utc>) -> AppResult<ReclaimReport> {
        let paths = self.store.expired_file_paths(now).await?;

        let mut removed_blobs = 0;
        if !paths.is_empty() {
            match self.blobs.remove(&paths).await {
                Ok(()) => removed_blobs = paths.len() as u64,
                Err(e) => {
                    warn!(paths = paths.len(), error = %e, "Blob removal batch failed");
                }
            }
        }

        let deleted_rows = self.store.delete_expired(now).await?;

        let report = ReclaimReport {
            deleted_rows,
            removed_blobs,
        };
        if deleted_rows > 0 || removed_blobs > 0 {
            info!(deleted_rows, removed_blobs, "Reclaimed expired shares");
        }
        Ok(report)
    }
}
