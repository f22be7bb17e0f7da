//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use dropcode_core::config::{BlobProvider, StorageConfig};
use dropcode_core::result::AppResult;
use dropcode_core::traits::storage::BlobStore;

use crate::providers::local::LocalBlobStore;
use crate::signing::BlobUrlSigner;

/// Build the configured blob store.
///
/// `public_base_url` roots the signed pointers the local provider serves.
pub async fn build_blob_store(
    config: &StorageConfig,
    public_base_url: &str,
) -> AppResult<Arc<dyn BlobStore>> {
    match config.provider {
        BlobProvider::Local => {
            let signer = BlobUrlSigner::new(&config.signing_secret, public_base_url);
            let store = LocalBlobStore::new(&config.local.root_path, &config.bucket, signer).await?;
            info!(
                root = %config.local.root_path,
                bucket = %config.bucket,
                "Using local blob store"
            );
            Ok(Arc::new(store))
        }
        #[cfg(feature = "s3")]
        BlobProvider::S3 => {
            let store = crate::providers::s3::S3BlobStore::new(&config.s3, &config.bucket).await?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "s3"))]
        BlobProvider::S3 => Err(dropcode_core::error::AppError::configuration(
            "storage.provider = \"s3\" requires building with the `s3` feature",
        )),
    }
}
