//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dropcode_core::types::ShareId;

use super::code::ShortCode;
use super::ttl::ShareTtl;

/// What a share carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ShareKind {
    /// Inline text stored in the row.
    Text,
    /// A single file stored in the blob store.
    File,
}

/// A row of the `shares` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: ShareId,
    /// Short code in `[1, 100]`.
    pub short_code: i32,
    /// Unguessable token; namespaces the blob path of file shares.
    #[serde(skip_serializing)]
    pub token: String,
    /// Payload kind.
    pub kind: ShareKind,
    /// Inline text (text shares only).
    pub text_content: Option<String>,
    /// Blob path (file shares only).
    pub file_path: Option<String>,
    /// Sanitized original file name (file shares only).
    pub file_name: Option<String>,
    /// Content type recorded at upload (file shares only).
    pub content_type: Option<String>,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
    /// When the share stops being served.
    pub expires_at: DateTime<Utc>,
    /// When the share was viewed under one-time semantics.
    pub consumed_at: Option<DateTime<Utc>>,
}

impl Share {
    /// Active shares hold their code: not yet expired and never consumed.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now && self.consumed_at.is_none()
    }

    /// Whether the share's lifetime is over at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Whether the share has been consumed.
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// The blob path, if this is a file share with a non-empty path.
    pub fn blob_path(&self) -> Option<&str> {
        self.file_path.as_deref().filter(|p| !p.is_empty())
    }

    /// The short code as a typed value.
    pub fn code(&self) -> Option<ShortCode> {
        ShortCode::new(i64::from(self.short_code))
    }
}

/// Blob reference for a file share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Path inside the bucket, `{token}/{file_name}`.
    pub path: String,
    /// Sanitized file name offered for download.
    pub file_name: String,
    /// Content type recorded at upload.
    pub content_type: String,
}

/// Data required to insert a new share row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShare {
    /// Identifier assigned before insert.
    pub id: ShareId,
    /// Allocated code.
    pub short_code: ShortCode,
    /// Unguessable token.
    pub token: String,
    /// Payload kind.
    pub kind: ShareKind,
    /// Inline text (text shares only).
    pub text_content: Option<String>,
    /// Blob reference (file shares only).
    pub file: Option<FileRef>,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Expiry instant, `created_at + ttl`.
    pub expires_at: DateTime<Utc>,
}

impl NewShare {
    /// A text share created at `now`.
    pub fn text(
        short_code: ShortCode,
        token: String,
        text: String,
        now: DateTime<Utc>,
        ttl: ShareTtl,
    ) -> Self {
        Self {
            id: ShareId::new(),
            short_code,
            token,
            kind: ShareKind::Text,
            text_content: Some(text),
            file: None,
            created_at: now,
            expires_at: now + ttl.duration(),
        }
    }

    /// A file share created at `now`.
    pub fn file(
        short_code: ShortCode,
        token: String,
        file: FileRef,
        now: DateTime<Utc>,
        ttl: ShareTtl,
    ) -> Self {
        Self {
            id: ShareId::new(),
            short_code,
            token,
            kind: ShareKind::File,
            text_content: None,
            file: Some(file),
            created_at: now,
            expires_at: now + ttl.duration(),
        }
    }

    /// The row as it looks right after insert.
    pub fn into_share(self) -> Share {
        let (file_path, file_name, content_type) = match self.file {
            Some(f) => (Some(f.path), Some(f.file_name), Some(f.content_type)),
            None => (None, None, None),
        };
        Share {
            id: self.id,
            short_code: self.short_code.as_i32(),
            token: self.token,
            kind: self.kind,
            text_content: self.text_content,
            file_path,
            file_name,
            content_type,
            created_at: self.created_at,
            expires_at: self.expires_at,
            consumed_at: None,
        }
    }
}
