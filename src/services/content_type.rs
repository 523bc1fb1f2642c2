//! Content type inference from object key extensions.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Fallback for unknown or missing extensions.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

static CONTENT_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("html", "text/html"),
        ("htm", "text/html"),
        ("css", "text/css"),
        ("js", "application/javascript"),
        ("json", "application/json"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("gif", "image/gif"),
        ("svg", "image/svg+xml"),
        ("pdf", "application/pdf"),
        ("txt", "text/plain"),
        ("xml", "application/xml"),
        ("zip", "application/zip"),
    ])
});

/// Get the content type for an object key based on its extension.
///
/// Only the last path segment is considered, and the extension match is
/// case-insensitive. Contents are never sniffed.
pub fn infer_content_type(key: &str) -> &'static str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    file_name
        .rfind('.')
        .map(|dot| file_name[dot + 1..].to_ascii_lowercase())
        .and_then(|ext| CONTENT_TYPES.get(ext.as_str()).copied())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
