//! Cross-origin response metadata.
//!
//! Every response the gateway emits — preflight, error, or relayed
//! upstream — carries this header set. Browsers refuse to hand the
//! response to the calling page otherwise, which would defeat the
//! gateway's purpose.

use axum::http::{header, HeaderMap, HeaderValue, Method};

/// Methods the gateway will forward.
pub static ALLOWED_METHODS: &[Method] = &[
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// Comma-joined form of [`ALLOWED_METHODS`] for `access-control-allow-methods`.
const ALLOWED_METHODS_VALUE: &str = "GET,POST,PUT,PATCH,DELETE,HEAD,OPTIONS";

/// Build the CORS header set for a response.
///
/// Echoes the caller's `origin` when given, otherwise falls back to `*`.
pub fn headers(origin: Option<&HeaderValue>) -> HeaderMap {
    let allow_origin = origin
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    let mut map = HeaderMap::with_capacity(5);
    map.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
    map.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    map.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS_VALUE),
    );
    map.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
    map.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("*"),
    );
    map
}
