//! Upload file name sanitizing.

use dropcode_entity::share::{MAX_FILE_NAME_BYTES, MAX_FILE_NAME_CHARS};

/// Name used when the upload carried none.
pub const FALLBACK_FILE_NAME: &str = "file";

/// Make an uploaded file name safe to use as the last blob path segment.
///
/// Path separators and control characters become `_`. The result is capped
/// at 200 characters and at 240 UTF-8 bytes, cut on a character boundary.
/// Empty names, and names made only of dots, become `file`.
pub fn sanitize_file_name(name: &str) -> String {
    let name = if name.is_empty() { FALLBACK_FILE_NAME } else { name };

    let mut cleaned = String::with_capacity(name.len().min(MAX_FILE_NAME_BYTES));
    for c in name.chars().take(MAX_FILE_NAME_CHARS) {
        let c = if c == '/' || c == '\\' || c.is_control() {
            '_'
        } else {
            c
        };
        if cleaned.len() + c.len_utf8() > MAX_FILE_NAME_BYTES {
            break;
        }
        cleaned.push(c);
    }

    if cleaned.chars().all(|c| c == '.') {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned
    }
}
