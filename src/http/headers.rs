//! Header classification and rewriting.
//!
//! # Responsibilities
//! - Strip hop-by-hop headers in both directions
//! - Strip identity-leaking headers before contacting the upstream
//! - Assemble the client-facing header set from upstream headers, CORS
//!   metadata, and the mandatory cache directive
//!
//! # Design Decisions
//! - Denylists are static data; `HeaderMap` gives case-insensitive keys
//! - Single-value semantics: `insert` makes the last value win
//! - Values are copied untouched; only names are classified

use axum::http::{header, HeaderMap, HeaderValue};

use crate::http::cors;
use crate::security::auth::PROXY_KEY_HEADER;

/// Headers meaningful only for a single transport connection, never
/// relayed end-to-end (RFC 9110 §7.6.1).
pub static HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// Headers that would leak the gateway's or the caller's identity to the
/// upstream, dropped outbound on top of the hop-by-hop set.
static OUTBOUND_DROPPED: &[&str] = &["host", "origin", "referer"];

/// Header name prefixes dropped outbound (CDN- and proxy-injected).
static OUTBOUND_DROPPED_PREFIXES: &[&str] = &["cf-", "x-forwarded-"];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Sanitize client headers for the outbound upstream request.
///
/// Drops hop-by-hop headers, identity-leaking headers, CDN/proxy
/// forwarding headers, and the shared-secret header.
pub fn filter_outbound(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::new();
    for (name, value) in headers {
        // HeaderName is already lowercase.
        let name_str = name.as_str();
        if is_hop_by_hop(name_str) {
            continue;
        }
        if OUTBOUND_DROPPED.contains(&name_str) {
            continue;
        }
        if OUTBOUND_DROPPED_PREFIXES
            .iter()
            .any(|p| name_str.starts_with(p))
        {
            continue;
        }
        if name_str == PROXY_KEY_HEADER {
            continue;
        }
        out.insert(name.clone(), value.clone());
    }
    out
}

/// Assemble the client-facing header set from an upstream response.
///
/// Starts from the CORS set for the caller's origin, copies upstream
/// headers minus hop-by-hop, then forces `cache-control: no-store` so no
/// relayed response is ever served from a cache.
pub fn filter_inbound(upstream: &HeaderMap, origin: Option<&HeaderValue>) -> HeaderMap {
    let mut out = cors::headers(origin);
    for (name, value) in upstream {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        out.insert(name.clone(), value.clone());
    }
    out.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    out
}
