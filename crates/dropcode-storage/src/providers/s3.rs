//! S3-compatible blob store (requires the `s3` feature).

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use bytes::Bytes;
use tracing::{debug, info, warn};

use dropcode_core::config::S3StorageConfig;
use dropcode_core::error::{AppError, ErrorKind};
use dropcode_core::result::AppResult;
use dropcode_core::traits::storage::BlobStore;

use crate::disposition::content_disposition;

/// `DeleteObjects` accepts at most this many keys per request.
const DELETE_BATCH: usize = 1000;

/// S3-compatible blob store.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Create a client for `bucket` from configuration.
    ///
    /// Static credentials are used when both keys are set; otherwise the
    /// default AWS credential chain applies.
    pub async fn new(config: &S3StorageConfig, bucket: &str) -> AppResult<Self> {
        info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket,
            "Initializing S3 blob store"
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if !config.access_key.is_empty() && !config.secret_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "dropcode-config",
            ));
        }
        let shared = loader.load().await;

        let mut builder =
            aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(config.endpoint.clone());
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => {
                warn!(bucket = %self.bucket, error = %e, "S3 health check failed");
                Ok(false)
            }
        }
    }

    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path)
            .content_type(content_type)
            .if_none_match("*")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let status = e.raw_response().map(|r| r.status().as_u16());
                if status == Some(412) {
                    AppError::conflict(format!("The resource already exists: {path}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to upload blob: {path}"),
                        e,
                    )
                }
            })?;

        debug!(path, bytes = len, content_type, "Uploaded blob");
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        let mut failed = 0usize;

        for chunk in paths.chunks(DELETE_BATCH) {
            let objects = chunk
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Invalid object key", e)
                })?;
            let delete = Delete::builder()
                .set_objects(Some(objects))
                .quiet(true)
                .build()
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Storage, "Invalid delete request", e)
                })?;

            match self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
            {
                Ok(output) => {
                    for err in output.errors() {
                        warn!(
                            key = err.key().unwrap_or_default(),
                            code = err.code().unwrap_or_default(),
                            "Failed to remove blob"
                        );
                    }
                    failed += output.errors().len();
                }
                Err(e) => {
                    warn!(error = %e, keys = chunk.len(), "Blob removal batch failed");
                    failed += chunk.len();
                }
            }
        }

        if failed == 0 {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Failed to remove {failed} of {} blobs",
                paths.len()
            )))
        }
    }

    async fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String> {
        let presigning = PresigningConfig::expires_in(ttl).map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Invalid presigning lifetime", e)
        })?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .set_response_content_disposition(download_name.map(content_disposition))
            .presigned(presigning)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create signed URL: {path}"),
                    e,
                )
            })?;

        Ok(request.uri().to_string())
    }
}
