//! Share token generation.

use uuid::Uuid;

/// Generates the unguessable per-share token.
#[derive(Debug, Clone, Default)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// A random (version 4) UUID in its hyphenated text form.
    pub fn generate_token(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// Blob path for a file share: `{token}/{file_name}`.
    pub fn blob_path(&self, token: &str, file_name: &str) -> String {
        format!("{token}/{file_name}")
    }
}
