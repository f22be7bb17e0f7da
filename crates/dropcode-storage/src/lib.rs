//! # dropcode-storage
//!
//! Blob store providers for share payloads. Supports the local filesystem
//! (with self-served signed pointers) and S3-compatible object stores
//! (with presigned URLs, behind the `s3` feature).

pub mod disposition;
pub mod factory;
pub mod providers;
pub mod signing;

pub use disposition::content_disposition;
pub use factory::build_blob_store;
pub use providers::local::LocalBlobStore;
pub use signing::{BlobClaims, BlobUrlSigner};
