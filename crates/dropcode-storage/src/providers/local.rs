//! Local filesystem blob store.
//!
//! Blobs live under `{root}/{bucket}/{path}` with a `{path}.meta.json`
//! sidecar recording the content type. Read pointers are JWTs served back
//! through this process.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use dropcode_core::error::{AppError, ErrorKind};
use dropcode_core::result::AppResult;
use dropcode_core::traits::storage::{BlobStore, DEFAULT_CONTENT_TYPE, SignedBlob};

use crate::signing::BlobUrlSigner;

const META_SUFFIX: &str = ".meta.json";

#[derive(Debug, Serialize, Deserialize)]
struct BlobMeta {
    content_type: String,
}

/// Filesystem-backed blob store.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    bucket_root: PathBuf,
    signer: BlobUrlSigner,
}

impl LocalBlobStore {
    /// Create a store rooted at `{root_path}/{bucket}`, creating it if needed.
    pub async fn new(root_path: &str, bucket: &str, signer: BlobUrlSigner) -> AppResult<Self> {
        let bucket_root = PathBuf::from(root_path).join(bucket);
        fs::create_dir_all(&bucket_root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", bucket_root.display()),
                e,
            )
        })?;
        Ok(Self {
            bucket_root,
            signer,
        })
    }

    /// Map a bucket-relative path to a file under the bucket root.
    ///
    /// Only plain name components are accepted.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !plain || relative.as_os_str().is_empty() {
            return Err(AppError::storage(format!("Invalid blob path: {path}")));
        }
        Ok(self.bucket_root.join(relative))
    }

    fn meta_path(file: &Path) -> PathBuf {
        let mut name = file.as_os_str().to_owned();
        name.push(META_SUFFIX);
        PathBuf::from(name)
    }

    async fn read_content_type(file: &Path) -> String {
        match fs::read(Self::meta_path(file)).await {
            Ok(raw) => serde_json::from_slice::<BlobMeta>(&raw)
                .map(|m| m.content_type)
                .unwrap_or_else(|_| DEFAULT_CONTENT_TYPE.to_string()),
            Err(_) => DEFAULT_CONTENT_TYPE.to_string(),
        }
    }

    async fn remove_one(&self, path: &str) -> AppResult<()> {
        let file = self.resolve(path)?;
        for target in [Self::meta_path(&file), file.clone()] {
            match fs::remove_file(&target).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to delete blob: {path}"),
                        e,
                    ));
                }
            }
        }
        // Token directories hold a single blob; drop them once empty.
        if let Some(parent) = file.parent() {
            if parent != self.bucket_root {
                let _ = fs::remove_dir(parent).await;
            }
        }
        Ok(())
    }

    /// Read a blob and its recorded content type.
    pub async fn read(&self, path: &str) -> AppResult<(Bytes, String)> {
        let file = self.resolve(path)?;
        let data = fs::read(&file).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {path}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to read blob: {path}"), e)
            }
        })?;
        let content_type = Self::read_content_type(&file).await;
        Ok((Bytes::from(data), content_type))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.bucket_root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, path: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let file = self.resolve(path)?;
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        let mut handle = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&file)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    AppError::conflict(format!("The resource already exists: {path}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to create blob: {path}"),
                        e,
                    )
                }
            })?;

        let written = async {
            handle.write_all(&data).await?;
            handle.flush().await?;
            let meta = serde_json::to_vec(&BlobMeta {
                content_type: content_type.to_string(),
            })?;
            fs::write(Self::meta_path(&file), meta).await
        }
        .await;

        if let Err(e) = written {
            drop(handle);
            if let Err(cleanup) = self.remove_one(path).await {
                warn!(path, error = %cleanup, "Failed to clean up partial blob");
            }
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {path}"),
                e,
            ));
        }

        debug!(path, bytes = data.len(), content_type, "Stored blob");
        Ok(())
    }

    async fn remove(&self, paths: &[String]) -> AppResult<()> {
        let mut failed = Vec::new();
        for path in paths {
            if let Err(e) = self.remove_one(path).await {
                warn!(path = %path, error = %e, "Failed to remove blob");
                failed.push(path.as_str());
            }
        }

        if failed.is_empty() {
            debug!(count = paths.len(), "Removed blobs");
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Failed to remove {} of {} blobs: {}",
                failed.len(),
                paths.len(),
                failed.join(", ")
            )))
        }
    }

    async fn signed_url(
        &self,
        path: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String> {
        self.resolve(path)?;
        let signature = self.signer.sign(path, ttl, download_name)?;
        Ok(self.signer.url_for(&signature))
    }

    async fn open_signed(&self, signature: &str) -> AppResult<SignedBlob> {
        let claims = self.signer.verify(signature)?;
        let (data, content_type) = self.read(&claims.path).await?;
        Ok(SignedBlob {
            path: claims.path,
            data,
            content_type,
            download_name: claims.name,
        })
    }
}
