//! Share domain entities.

pub mod code;
pub mod model;
pub mod ttl;

pub use code::ShortCode;
pub use model::{FileRef, NewShare, Share, ShareKind};
pub use ttl::ShareTtl;

/// Maximum length of a text payload, in characters.
pub const MAX_TEXT_CHARS: usize = 100_000;

/// Maximum size of a file payload, in bytes (20 MiB).
pub const MAX_FILE_BYTES: usize = 20 * 1024 * 1024;

/// Maximum length of a stored file name, in characters.
pub const MAX_FILE_NAME_CHARS: usize = 200;

/// Maximum length of a stored file name in UTF-8 bytes. Leaves room for
/// blob store sidecar suffixes within a 255-byte path component.
pub const MAX_FILE_NAME_BYTES: usize = 240;

/// Lifetime of a signed download pointer, in seconds.
pub const SIGNED_URL_TTL_SECONDS: u64 = 60;
