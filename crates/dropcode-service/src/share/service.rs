//! Share create and resolve operations.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use dropcode_core::error::{AppError, ErrorKind};
use dropcode_core::result::AppResult;
use dropcode_core::traits::storage::{BlobStore, DEFAULT_CONTENT_TYPE};
use dropcode_core::traits::Clock;
use dropcode_core::types::ShareId;
use dropcode_database::ShareStore;
use dropcode_entity::share::{
    FileRef, MAX_FILE_BYTES, MAX_TEXT_CHARS, NewShare, SIGNED_URL_TTL_SECONDS, ShareKind,
    ShareTtl, ShortCode,
};

use super::filename::sanitize_file_name;
use super::link::LinkService;
use crate::allocator::CodeAllocator;

/// Message for a resolve of a share whose lifetime is over.
pub const EXPIRED_MESSAGE: &str = "This link has expired";
/// Message for a resolve of a consumed share.
pub const CONSUMED_MESSAGE: &str = "This link was already used";
/// Message for a code with no share behind it.
pub const NOT_FOUND_MESSAGE: &str = "Share not found";
/// Message when neither a text nor a file payload was supplied.
pub const EMPTY_PAYLOAD_MESSAGE: &str = "Provide either text or a file.";

/// Message for a file payload above [`MAX_FILE_BYTES`].
pub fn file_too_large_message() -> String {
    format!("File too large (max {MAX_FILE_BYTES} bytes).")
}

/// Content to publish.
#[derive(Debug, Clone)]
pub enum SharePayload {
    /// Inline text.
    Text(String),
    /// A single uploaded file.
    File {
        /// Raw bytes.
        data: Bytes,
        /// Name as uploaded, before sanitizing.
        name: String,
        /// Content type as uploaded, if any.
        content_type: Option<String>,
    },
}

impl SharePayload {
    fn kind(&self) -> ShareKind {
        match self {
            Self::Text(_) => ShareKind::Text,
            Self::File { .. } => ShareKind::File,
        }
    }

    /// Check size limits. Runs before any store is touched.
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Text(text) => {
                if text.trim().is_empty() {
                    return Err(AppError::validation(EMPTY_PAYLOAD_MESSAGE));
                }
                if text.chars().count() > MAX_TEXT_CHARS {
                    return Err(AppError::validation(format!(
                        "Text too large (max {MAX_TEXT_CHARS} chars)."
                    )));
                }
            }
            Self::File { data, .. } => {
                if data.is_empty() {
                    return Err(AppError::validation(EMPTY_PAYLOAD_MESSAGE));
                }
                if data.len() > MAX_FILE_BYTES {
                    return Err(AppError::validation(file_too_large_message()));
                }
            }
        }
        Ok(())
    }
}

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreatedShare {
    /// Row id.
    pub id: ShareId,
    /// The allocated code.
    pub code: ShortCode,
    /// Payload kind.
    pub kind: ShareKind,
    /// When the share stops being served.
    pub expires_at: DateTime<Utc>,
}

/// A live share's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedShare {
    /// Inline text.
    Text {
        /// The text.
        content: String,
        /// When the share stops being served.
        expires_at: DateTime<Utc>,
    },
    /// A file, reachable through a short-lived signed pointer.
    File {
        /// Download file name.
        file_name: String,
        /// Content type recorded at upload.
        content_type: String,
        /// Signed read pointer.
        signed_url: String,
        /// Pointer lifetime in seconds.
        expires_in_seconds: u64,
    },
}

/// What a short code resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The share is live.
    Live(ResolvedShare),
    /// No share has ever held the code, or the code is out of range.
    NotFound,
    /// The newest share with the code has expired.
    Expired,
    /// The newest share with the code was consumed.
    AlreadyConsumed,
}

impl ResolveOutcome {
    /// Map the non-live outcomes to errors with their distinct messages.
    pub fn into_result(self) -> AppResult<ResolvedShare> {
        match self {
            Self::Live(share) => Ok(share),
            Self::NotFound => Err(AppError::not_found(NOT_FOUND_MESSAGE)),
            Self::Expired => Err(AppError::gone(EXPIRED_MESSAGE)),
            Self::AlreadyConsumed => Err(AppError::gone(CONSUMED_MESSAGE)),
        }
    }
}

/// Orchestrates share creation and resolution over the row and blob stores.
#[derive(Debug, Clone)]
pub struct ShareService {
    store: Arc<dyn ShareStore>,
    blobs: Arc<dyn BlobStore>,
    allocator: CodeAllocator,
    links: LinkService,
    clock: Arc<dyn Clock>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        store: Arc<dyn ShareStore>,
        blobs: Arc<dyn BlobStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            allocator: CodeAllocator::new(Arc::clone(&store), Arc::clone(&clock)),
            links: LinkService::new(),
            store,
            blobs,
            clock,
        }
    }

    /// Publish `payload` for `ttl`.
    ///
    /// File payloads are written to the blob store before the row exists. If
    /// the row insert then fails, the blob is removed again on a best-effort
    /// basis and the insert error is returned.
    pub async fn create(&self, payload: SharePayload, ttl: ShareTtl) -> AppResult<CreatedShare> {
        payload.validate()?;

        let token = self.links.generate_token();
        let code = self.allocator.allocate().await?;
        let kind = payload.kind();

        let (new_share, blob_path) = match payload {
            SharePayload::Text(text) => (
                NewShare::text(code, token, text, self.clock.now(), ttl),
                None,
            ),
            SharePayload::File {
                data,
                name,
                content_type,
            } => {
                let file_name = sanitize_file_name(&name);
                let path = self.links.blob_path(&token, &file_name);
                let content_type = content_type
                    .filter(|ct| !ct.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

                // The path embeds a fresh token, so a collision is a store fault.
                self.blobs
                    .put(&path, data, &content_type)
                    .await
                    .map_err(|e| match e.kind {
                        ErrorKind::Conflict => {
                            AppError::storage(format!("Blob path already in use: {path}"))
                        }
                        _ => e,
                    })?;

                let file = FileRef {
                    path: path.clone(),
                    file_name,
                    content_type,
                };
                (
                    NewShare::file(code, token, file, self.clock.now(), ttl),
                    Some(path),
                )
            }
        };

        let share = match self.store.insert(&new_share).await {
            Ok(share) => share,
            Err(err) => {
                if let Some(path) = blob_path {
                    self.discard_orphan(path).await;
                }
                return Err(err);
            }
        };

        info!(
            share_id = %share.id,
            code = code.get(),
            kind = ?kind,
            ttl_seconds = ttl.as_seconds(),
            "Share created"
        );

        Ok(CreatedShare {
            id: share.id,
            code,
            kind,
            expires_at: share.expires_at,
        })
    }

    async fn discard_orphan(&self, path: String) {
        if let Err(e) = self.blobs.remove(std::slice::from_ref(&path)).await {
            warn!(path = %path, error = %e, "Failed to remove orphaned blob after insert failure");
        }
    }

    /// Look up what `code` currently points at.
    ///
    /// Consumption is checked before expiry. Resolving never consumes.
    pub async fn resolve(&self, code: i64) -> AppResult<ResolveOutcome> {
        let Some(code) = ShortCode::new(code) else {
            return Ok(ResolveOutcome::NotFound);
        };

        let Some(share) = self.store.find_latest_by_code(code.as_i32()).await? else {
            return Ok(ResolveOutcome::NotFound);
        };

        if share.is_consumed() {
            return Ok(ResolveOutcome::AlreadyConsumed);
        }
        if share.is_expired(self.clock.now()) {
            return Ok(ResolveOutcome::Expired);
        }

        let resolved = match share.kind {
            ShareKind::Text => ResolvedShare::Text {
                content: share.text_content.unwrap_or_default(),
                expires_at: share.expires_at,
            },
            ShareKind::File => {
                let path = share.blob_path().ok_or_else(|| {
                    AppError::internal(format!("File share {} has no blob path", share.id))
                })?;
                let file_name = share
                    .file_name
                    .clone()
                    .unwrap_or_else(|| super::filename::FALLBACK_FILE_NAME.to_string());
                let signed_url = self
                    .blobs
                    .signed_url(
                        path,
                        Duration::from_secs(SIGNED_URL_TTL_SECONDS),
                        Some(&file_name),
                    )
                    .await?;
                ResolvedShare::File {
                    file_name,
                    content_type: share
                        .content_type
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
                    signed_url,
                    expires_in_seconds: SIGNED_URL_TTL_SECONDS,
                }
            }
        };

        Ok(ResolveOutcome::Live(resolved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use dropcode_core::traits::ManualClock;
    use dropcode_database::MemoryShareStore;
    use dropcode_entity::share::Share;
    use dropcode_storage::{BlobUrlSigner, LocalBlobStore};

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<MemoryShareStore>,
        blobs: Arc<LocalBlobStore>,
        clock: Arc<ManualClock>,
        service: ShareService,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryShareStore::new());
        let signer = BlobUrlSigner::new("service-test-signing-secret", "http://localhost:8080");
        let blobs = Arc::new(
            LocalBlobStore::new(dir.path().to_str().unwrap(), "shares", signer)
                .await
                .unwrap(),
        );
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service = ShareService::new(store.clone(), blobs.clone(), clock.clone());
        Fixture {
            _dir: dir,
            store,
            blobs,
            clock,
            service,
        }
    }

    fn text(s: &str) -> SharePayload {
        SharePayload::Text(s.to_string())
    }

    fn file(bytes: &'static [u8], name: &str, content_type: Option<&str>) -> SharePayload {
        SharePayload::File {
            data: Bytes::from_static(bytes),
            name: name.to_string(),
            content_type: content_type.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_then_resolve_text() {
        let f = fixture().await;
        let created = f
            .service
            .create(text("hello"), ShareTtl::FifteenMinutes)
            .await
            .unwrap();
        assert_eq!(created.code.get(), 1);
        assert_eq!(
            created.expires_at,
            f.clock.now() + chrono::Duration::seconds(900)
        );

        let outcome = f.service.resolve(1).await.unwrap();
        assert_eq!(
            outcome,
            ResolveOutcome::Live(ResolvedShare::Text {
                content: "hello".to_string(),
                expires_at: created.expires_at,
            })
        );

        // Text is not consumed by viewing it.
        assert!(matches!(
            f.service.resolve(1).await.unwrap(),
            ResolveOutcome::Live(_)
        ));
    }

    #[tokio::test]
    async fn test_create_then_resolve_file_yields_bytes() {
        let f = fixture().await;
        f.service
            .create(
                file(b"file body", "a.txt", Some("text/plain")),
                ShareTtl::FifteenMinutes,
            )
            .await
            .unwrap();

        let ResolveOutcome::Live(ResolvedShare::File {
            file_name,
            content_type,
            signed_url,
            expires_in_seconds,
        }) = f.service.resolve(1).await.unwrap()
        else {
            panic!("expected a live file share");
        };
        assert_eq!(file_name, "a.txt");
        assert_eq!(content_type, "text/plain");
        assert_eq!(expires_in_seconds, 60);

        let signature = signed_url.rsplit('/').next().unwrap();
        let blob = f.blobs.open_signed(signature).await.unwrap();
        assert_eq!(&blob.data[..], b"file body");
        assert_eq!(blob.download_name.as_deref(), Some("a.txt"));
    }

    #[tokio::test]
    async fn test_file_defaults_and_sanitizing() {
        let f = fixture().await;
        f.service
            .create(file(b"x", "dir/evil\\name.bin", None), ShareTtl::OneDay)
            .await
            .unwrap();

        let share = f.store.find_latest_by_code(1).await.unwrap().unwrap();
        assert_eq!(share.file_name.as_deref(), Some("dir_evil_name.bin"));
        assert_eq!(share.content_type.as_deref(), Some(DEFAULT_CONTENT_TYPE));
        assert_eq!(
            share.file_path,
            Some(format!("{}/dir_evil_name.bin", share.token))
        );
    }

    #[tokio::test]
    async fn test_text_length_boundary() {
        let f = fixture().await;
        let exact = "a".repeat(MAX_TEXT_CHARS);
        assert!(
            f.service
                .create(SharePayload::Text(exact), ShareTtl::FifteenMinutes)
                .await
                .is_ok()
        );

        let over = "a".repeat(MAX_TEXT_CHARS + 1);
        let err = f
            .service
            .create(SharePayload::Text(over), ShareTtl::FifteenMinutes)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(f.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_before_storage() {
        let f = fixture().await;
        let payload = SharePayload::File {
            data: Bytes::from(vec![0u8; MAX_FILE_BYTES + 1]),
            name: "big.bin".to_string(),
            content_type: None,
        };
        let err = f
            .service
            .create(payload, ShareTtl::FifteenMinutes)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(f.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected() {
        let f = fixture().await;
        let err = f
            .service
            .create(text("   \n"), ShareTtl::FifteenMinutes)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, EMPTY_PAYLOAD_MESSAGE);
    }

    #[tokio::test]
    async fn test_hundred_and_first_create_is_exhausted() {
        let f = fixture().await;
        for expected in 1..=100u8 {
            let created = f
                .service
                .create(text("x"), ShareTtl::OneDay)
                .await
                .unwrap();
            assert_eq!(created.code.get(), expected);
        }

        let err = f
            .service
            .create(text("x"), ShareTtl::OneDay)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ResourceExhausted);
    }

    #[tokio::test]
    async fn test_resolve_expired_and_out_of_range() {
        let f = fixture().await;
        f.service
            .create(text("hello"), ShareTtl::FifteenMinutes)
            .await
            .unwrap();

        f.clock.advance(chrono::Duration::seconds(900));
        assert_eq!(f.service.resolve(1).await.unwrap(), ResolveOutcome::Expired);

        assert_eq!(f.service.resolve(0).await.unwrap(), ResolveOutcome::NotFound);
        assert_eq!(f.service.resolve(101).await.unwrap(), ResolveOutcome::NotFound);
        assert_eq!(f.service.resolve(2).await.unwrap(), ResolveOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_consumed_is_checked_before_expiry() {
        let f = fixture().await;
        let created = f
            .service
            .create(text("once"), ShareTtl::FifteenMinutes)
            .await
            .unwrap();
        f.store
            .mark_consumed(created.id, f.clock.now())
            .await
            .unwrap();

        assert_eq!(
            f.service.resolve(1).await.unwrap(),
            ResolveOutcome::AlreadyConsumed
        );
        f.clock.advance(chrono::Duration::days(2));
        assert_eq!(
            f.service.resolve(1).await.unwrap(),
            ResolveOutcome::AlreadyConsumed
        );
    }

    #[tokio::test]
    async fn test_resolve_sees_newest_share_for_reused_code() {
        let f = fixture().await;
        f.service
            .create(text("old"), ShareTtl::FifteenMinutes)
            .await
            .unwrap();
        f.clock.advance(chrono::Duration::seconds(901));
        let created = f
            .service
            .create(text("new"), ShareTtl::FifteenMinutes)
            .await
            .unwrap();
        assert_eq!(created.code.get(), 1);

        let ResolveOutcome::Live(ResolvedShare::Text { content, .. }) =
            f.service.resolve(1).await.unwrap()
        else {
            panic!("expected live text");
        };
        assert_eq!(content, "new");
    }

    #[test]
    fn test_outcome_messages_are_distinct() {
        let expired = ResolveOutcome::Expired.into_result().unwrap_err();
        let consumed = ResolveOutcome::AlreadyConsumed.into_result().unwrap_err();
        let missing = ResolveOutcome::NotFound.into_result().unwrap_err();
        assert_eq!(expired.kind, ErrorKind::Gone);
        assert_eq!(consumed.kind, ErrorKind::Gone);
        assert_eq!(missing.kind, ErrorKind::NotFound);
        assert_ne!(expired.message, consumed.message);
    }

    /// Row store whose inserts always fail.
    #[derive(Debug, Default)]
    struct RejectingStore {
        inner: MemoryShareStore,
    }

    #[async_trait]
    impl ShareStore for RejectingStore {
        fn backend(&self) -> &str {
            "rejecting"
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
        async fn insert(&self, _share: &NewShare) -> AppResult<Share> {
            Err(AppError::database("insert rejected"))
        }
        async fn active_codes(&self, now: DateTime<Utc>) -> AppResult<Vec<i32>> {
            self.inner.active_codes(now).await
        }
        async fn find_latest_by_code(&self, code: i32) -> AppResult<Option<Share>> {
            self.inner.find_latest_by_code(code).await
        }
        async fn expired_file_paths(&self, now: DateTime<Utc>) -> AppResult<Vec<String>> {
            self.inner.expired_file_paths(now).await
        }
        async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
            self.inner.delete_expired(now).await
        }
        async fn mark_consumed(&self, id: ShareId, at: DateTime<Utc>) -> AppResult<bool> {
            self.inner.mark_consumed(id, at).await
        }
    }

    #[tokio::test]
    async fn test_failed_insert_removes_written_blob() {
        let f = fixture().await;
        let service = ShareService::new(
            Arc::new(RejectingStore::default()),
            f.blobs.clone(),
            f.clock.clone(),
        );

        let err = service
            .create(file(b"orphan", "a.txt", None), ShareTtl::FifteenMinutes)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
        assert_eq!(err.message, "insert rejected");

        let bucket = f._dir.path().join("shares");
        let leftover = std::fs::read_dir(&bucket).unwrap().count();
        assert_eq!(leftover, 0, "orphaned blob should have been removed");
    }

    #[tokio::test]
    async fn test_failed_insert_of_text_writes_nothing() {
        let f = fixture().await;
        let service = ShareService::new(
            Arc::new(RejectingStore::default()),
            f.blobs.clone(),
            f.clock.clone(),
        );
        assert!(
            service
                .create(text("hello"), ShareTtl::FifteenMinutes)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_long_multibyte_file_name_is_stored() {
        let f = fixture().await;
        let name = format!("{}.pdf", "報".repeat(120));
        f.service
            .create(
                file(b"%PDF", &name, Some("application/pdf")),
                ShareTtl::FifteenMinutes,
            )
            .await
            .unwrap();

        let ResolveOutcome::Live(ResolvedShare::File {
            file_name,
            signed_url,
            ..
        }) = f.service.resolve(1).await.unwrap()
        else {
            panic!("expected a live file share");
        };
        assert!(file_name.len() <= dropcode_entity::share::MAX_FILE_NAME_BYTES);
        assert!(file_name.starts_with('報'));

        let signature = signed_url.rsplit('/').next().unwrap();
        let blob = f.blobs.open_signed(signature).await.unwrap();
        assert_eq!(&blob.data[..], b"%PDF");
    }

    /// Blob store that reports every write as a collision.
    #[derive(Debug)]
    struct CollidingBlobs;

    #[async_trait]
    impl BlobStore for CollidingBlobs {
        fn provider_type(&self) -> &str {
            "colliding"
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }
        async fn put(&self, path: &str, _data: Bytes, _content_type: &str) -> AppResult<()> {
            Err(AppError::conflict(format!("Blob already exists: {path}")))
        }
        async fn remove(&self, _paths: &[String]) -> AppResult<()> {
            Ok(())
        }
        async fn signed_url(
            &self,
            path: &str,
            _ttl: Duration,
            _download_name: Option<&str>,
        ) -> AppResult<String> {
            Ok(format!("https://blobs.invalid/{path}"))
        }
    }

    #[tokio::test]
    async fn test_blob_collision_is_a_storage_failure() {
        let f = fixture().await;
        let service = ShareService::new(f.store.clone(), Arc::new(CollidingBlobs), f.clock.clone());

        let err = service
            .create(file(b"x", "a.txt", None), ShareTtl::FifteenMinutes)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(f.store.is_empty().await);
    }
}
