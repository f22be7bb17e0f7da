//! Request DTOs.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use bytes::Bytes;

use dropcode_core::error::AppError;
use dropcode_core::result::AppResult;
use dropcode_entity::share::ShareTtl;
use dropcode_service::SharePayload;
use dropcode_service::share::service::{EMPTY_PAYLOAD_MESSAGE, file_too_large_message};

/// An uploaded file part.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// Raw bytes.
    pub data: Bytes,
    /// Client-supplied file name.
    pub file_name: String,
    /// Client-supplied content type.
    pub content_type: Option<String>,
}

/// The `POST /api/shares` form.
#[derive(Debug, Clone, Default)]
pub struct CreateShareForm {
    /// `text` field.
    pub text: Option<String>,
    /// `file` field.
    pub file: Option<FileUpload>,
    /// `expiresInSeconds` field, unparsed.
    pub expires_in_seconds: Option<String>,
}

impl CreateShareForm {
    /// Read every known field from a multipart body. Unknown fields are skipped.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Multipart error", e))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "text" => {
                    form.text = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| multipart_error("Read error", e))?,
                    );
                }
                "expiresInSeconds" => {
                    form.expires_in_seconds = Some(
                        field
                            .text()
                            .await
                            .map_err(|e| multipart_error("Read error", e))?,
                    );
                }
                "file" => {
                    let file_name = field.file_name().unwrap_or("").to_string();
                    let content_type = field.content_type().map(String::from);
                    let data = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Read error", e))?;
                    form.file = Some(FileUpload {
                        data,
                        file_name,
                        content_type,
                    });
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The requested lifetime; 900 seconds when absent.
    pub fn ttl(&self) -> AppResult<ShareTtl> {
        match self.expires_in_seconds.as_deref().map(str::trim) {
            None | Some("") => Ok(ShareTtl::default()),
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| AppError::validation(ShareTtl::INVALID_MESSAGE))
                .and_then(ShareTtl::from_seconds),
        }
    }

    /// Pick the payload. A non-empty file wins over text.
    pub fn into_payload(self) -> AppResult<SharePayload> {
        if let Some(file) = self.file.filter(|f| !f.data.is_empty()) {
            return Ok(SharePayload::File {
                data: file.data,
                name: file.file_name,
                content_type: file.content_type,
            });
        }
        match self.text {
            Some(text) if !text.trim().is_empty() => Ok(SharePayload::Text(text)),
            _ => Err(AppError::validation(EMPTY_PAYLOAD_MESSAGE)),
        }
    }
}

/// A body cut off by the request size limit reads as an oversized file.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation(file_too_large_message())
    } else {
        AppError::validation(format!("{context}: {err}"))
    }
}
