//! Expired share reclamation job.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use dropcode_service::ReclaimService;

use crate::executor::{JobExecutionError, JobHandler};

/// Job type name for reclamation.
pub const RECLAIM_JOB: &str = "share_reclaim";

/// Runs one reclamation pass per invocation
#[derive(Debug)]
pub struct ReclaimJobHandler {
    service: Arc<ReclaimService>,
}

impl ReclaimJobHandler {
    /// Create a new reclaim job handler
    pub fn new(service: Arc<ReclaimService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl JobHandler for ReclaimJobHandler {
    fn job_type(&self) -> &str {
        RECLAIM_JOB
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let report = self.service.reclaim_now().await?;

        Ok(serde_json::json!({
            "task": RECLAIM_JOB,
            "deletedRows": report.deleted_rows,
            "removedBlobs": report.removed_blobs,
        }))
    }
}
