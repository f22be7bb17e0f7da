//! Job executor: dispatches scheduled jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use dropcode_core::error::AppError;

/// Trait for job handler implementations
#[async_trait]
pub trait JobHandler: Send + Sync + std::fmt::Debug {
    /// The job type this handler processes
    fn job_type(&self) -> &str;

    /// Run the job once, returning a summary of what it did
    async fn execute(&self) -> Result<Value, JobExecutionError>;
}

/// Error from job execution.
///
/// Jobs are not retried; the next scheduled tick is the only retry.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// No handler is registered for the job type
    #[error("No handler registered for job type '{0}'")]
    UnknownJob(String),

    /// The handler ran and failed
    #[error("Job failed: {0}")]
    Failed(#[from] AppError),
}

/// Dispatches jobs to the handler registered for their type
#[derive(Debug, Default)]
pub struct JobExecutor {
    handlers: HashMap<String, Arc<dyn JobHandler>>,
}

impl JobExecutor {
    /// Create an executor with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job handler, replacing any handler of the same type
    pub fn register(&mut self, handler: Arc<dyn JobHandler>) {
        let job_type = handler.job_type().to_string();
        tracing::info!(job_type = %job_type, "Registered job handler");
        self.handlers.insert(job_type, handler);
    }

    /// Execute the handler for `job_type`
    pub async fn execute(&self, job_type: &str) -> Result<Value, JobExecutionError> {
        let handler = self
            .handlers
            .get(job_type)
            .ok_or_else(|| JobExecutionError::UnknownJob(job_type.to_string()))?;

        tracing::debug!(job_type, "Executing job");
        handler.execute().await
    }

    /// Execute and log the outcome. Failures never propagate to the caller.
    pub async fn run_logged(&self, job_type: &str) {
        match self.execute(job_type).await {
            Ok(summary) => tracing::debug!(job_type, %summary, "Job finished"),
            Err(e) => tracing::error!(job_type, error = %e, "Job failed"),
        }
    }

    /// Check if a handler is registered for a job type
    pub fn has_handler(&self, job_type: &str) -> bool {
        self.handlers.contains_key(job_type)
    }
}
