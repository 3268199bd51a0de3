//! ETag helpers for room snapshots.
//!
//! A room's ETag changes exactly when its lock version does, so clients can
//! poll snapshots with `If-None-Match` and get `304 Not Modified` cheaply.

/// ETag for a room at `version`.
///
/// Format: `"room-{id}-v{version}"` (quoted, per RFC 9110)
pub fn room_etag(room_id: &str, version: i32) -> String {
    format!(r#""room-{room_id}-v{version}""#)
}

/// Whether an `If-None-Match` header value matches `etag`.
///
/// Accepts `*`, a single tag or a comma-separated list; weak tags (`W/"..."`)
/// compare by their opaque part.
pub fn if_none_match_hits(header_value: &str, etag: &str) -> bool {
    header_value.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}
