//! Helpers for sanitizing data before it enters log lines and spans.
//!
//! Logs are safe to share for debugging. Server bodies are truncated and
//! URLs lose any embedded credentials.

use std::path::Path;

/// Maximum length for logged error bodies to prevent log flooding.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Truncates a response body to [`MAX_ERROR_BODY_LENGTH`] bytes on a char
/// boundary.
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }

    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &body[..end])
}

/// Strips userinfo and the query string from a URL.
///
/// - `https://user:pw@host/api?token=x` → `https://****@host/api`
/// - `http://localhost:8000/api` → unchanged
pub fn redact_url(url: &str) -> String {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);

    if let Some(scheme_end) = without_query.find("://") {
        let after_scheme = &without_query[scheme_end + 3..];
        let authority_end = after_scheme.find('/').unwrap_or(after_scheme.len());
        if let Some(at_pos) = after_scheme[..authority_end].rfind('@') {
            let scheme = &without_query[..scheme_end + 3];
            return format!("{}****@{}", scheme, &after_scheme[at_pos + 1..]);
        }
    }

    without_query.to_string()
}

/// Returns only the filename component of a path.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
