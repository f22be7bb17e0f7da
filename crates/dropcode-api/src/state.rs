//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use dropcode_core::config::AppConfig;
use dropcode_core::traits::{BlobStore, Clock};
use dropcode_database::ShareStore;
use dropcode_service::{ReclaimService, ShareService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Share row store
    pub share_store: Arc<dyn ShareStore>,
    /// Share payload blob store
    pub blob_store: Arc<dyn BlobStore>,
    /// Create and resolve
    pub share_service: Arc<ShareService>,
    /// Reclamation
    pub reclaim_service: Arc<ReclaimService>,
    /// When the process started serving
    pub started_at: Instant,
}

impl AppState {
    /// Wire the services over the given stores.
    pub fn new(
        config: AppConfig,
        share_store: Arc<dyn ShareStore>,
        blob_store: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&share_store),
            Arc::clone(&blob_store),
            Arc::clone(&clock),
        ));
        let reclaim_service = Arc::new(ReclaimService::new(
            Arc::clone(&share_store),
            Arc::clone(&blob_store),
            clock,
        ));

        Self {
            config: Arc::new(config),
            share_store,
            blob_store,
            share_service,
            reclaim_service,
            started_at: Instant::now(),
        }
    }
}
