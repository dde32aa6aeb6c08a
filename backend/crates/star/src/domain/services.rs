//! Domain Services
//!
//! Entity tags for delegation representations.

use platform::crypto::{sha256, to_base64_url};

/// Compute the strong entity tag of a serialized representation
///
/// SHA-256 over the exact bytes, base64url without padding, in double
/// quotes. Must be fed the bytes that are actually sent to the client.
pub fn compute_etag(body: &[u8]) -> String {
    format!("\"{}\"", to_base64_url(&sha256(body)))
}

/// Evaluate an `If-None-Match` header value against the current tag
///
/// Accepts `*`, a single tag or a comma-separated list; weak tags (`W/"…"`)
/// match by their opaque part, as the weak comparison requires.
pub fn if_none_match_hits(header_value: &str, etag: &str) -> bool {
    header_value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}
