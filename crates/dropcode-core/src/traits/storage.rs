//! Blob store trait for pluggable share payload backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AppError;
use crate::result::AppResult;

/// Content type recorded when the uploader did not supply one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A blob fetched through a signed pointer, ready to be served.
#[derive(Debug, Clone)]
pub struct SignedBlob {
    /// Path within the bucket.
    pub path: String,
    /// Raw bytes.
    pub data: Bytes,
    /// Content type recorded at upload time.
    pub content_type: String,
    /// Suggested download filename, if the pointer carried one.
    pub download_name: Option<String>,
}

/// Trait for share payload storage backends.
///
/// Paths are relative to the configured bucket. Implementations exist for
/// the local filesystem and S3-compatible object stores.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store bytes at `path`.
    ///
    /// Never overwrites: an existing object at `path` yields a
    /// [`Conflict`](crate::error::ErrorKind::Conflict) error.
    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Remove every path in the batch.
    ///
    /// Missing paths count as removed. Per-path failures do not stop the
    /// batch; they are reported as a single aggregate error once every path
    /// has been attempted.
    async fn remove(&self, paths: &[String]) -> AppResult<()>;

    /// Create a time-boxed read pointer for `path`, optionally naming the
    /// file the client should save it as.
    async fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String>;

    /// Resolve a pointer issued by [`signed_url`](Self::signed_url) back to
    /// its blob. Only providers that serve their own pointers override this.
    async fn open_signed(&self, _signature: &str) -> AppResult<SignedBlob> {
        Err(AppError::not_found(format!(
            "Signed pointers are served directly by the {} provider",
            self.provider_type()
        )))
    }
}
