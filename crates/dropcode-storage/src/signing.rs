//! HS256-signed read pointers for blobs served by this process.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use dropcode_core::error::{AppError, ErrorKind};
use dropcode_core::result::AppResult;

/// Route prefix under which signed pointers are served.
pub const BLOB_ROUTE_PREFIX: &str = "/api/blobs";

/// Claims carried by a signed pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobClaims {
    /// Blob path within the bucket.
    pub path: String,
    /// Download file name, if one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Issued-at, seconds since epoch.
    pub iat: i64,
    /// Expiry, seconds since epoch.
    pub exp: i64,
}

/// Issues and verifies signed blob pointers.
#[derive(Clone)]
pub struct BlobUrlSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    base_url: String,
}

impl std::fmt::Debug for BlobUrlSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobUrlSigner")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl BlobUrlSigner {
    /// Create a signer whose URLs are rooted at `base_url`.
    pub fn new(secret: &str, base_url: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp".to_string()].into_iter().collect();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Sign a pointer valid for `ttl` from now.
    pub fn sign(&self, path: &str, ttl: Duration, name: Option<&str>) -> AppResult<String> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal(format!("Invalid pointer lifetime: {e}")))?;
        self.sign_until(path, name, now, now + ttl)
    }

    /// Sign a pointer with explicit issue and expiry instants.
    pub fn sign_until(
        &self,
        path: &str,
        name: Option<&str>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = BlobClaims {
            path: path.to_string(),
            name: name.map(str::to_string),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            AppError::with_source(ErrorKind::Internal, "Failed to sign blob pointer", e)
        })
    }

    /// The full URL for a signature.
    pub fn url_for(&self, signature: &str) -> String {
        format!("{}{}/{}", self.base_url, BLOB_ROUTE_PREFIX, signature)
    }

    /// Verify a signature and return its claims.
    pub fn verify(&self, signature: &str) -> AppResult<BlobClaims> {
        decode::<BlobClaims>(signature, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Download link has expired")
                }
                _ => AppError::unauthorized("Invalid download link"),
            })
    }
}
