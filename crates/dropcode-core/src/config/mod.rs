//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod database;
pub mod logging;
pub mod reclaim;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::reclaim::ReclaimConfig;
pub use self::storage::{BlobProvider, LocalStorageConfig, S3StorageConfig, StorageConfig};

use crate::error::AppError;

/// Minimum accepted length of the reclamation trigger secret.
pub const MIN_RECLAIM_SECRET_LEN: usize = 8;

/// Minimum accepted length of the signing secret for local signed pointers.
pub const MIN_SIGNING_SECRET_LEN: usize = 16;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Row store connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Reclamation trigger and schedule settings.
    #[serde(default)]
    pub reclaim: ReclaimConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DROPCODE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DROPCODE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    ///
    /// Messages name the offending key only; secret values are never echoed.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut invalid = Vec::new();

        if self.database.url.trim().is_empty() {
            invalid.push("database.url");
        }
        if self.storage.bucket.trim().is_empty() {
            invalid.push("storage.bucket");
        }
        if self.storage.provider == BlobProvider::Local
            && self.storage.signing_secret.len() < MIN_SIGNING_SECRET_LEN
        {
            invalid.push("storage.signing_secret");
        }
        if let Some(secret) = &self.reclaim.secret {
            if secret.len() < MIN_RECLAIM_SECRET_LEN {
                invalid.push("reclaim.secret");
            }
        }
        if self.server.public_base_url.trim().is_empty() {
            invalid.push("server.public_base_url");
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(AppError::configuration(format!(
                "Missing/invalid configuration. Invalid: {}",
                invalid.join(", ")
            )))
        }
    }
}
