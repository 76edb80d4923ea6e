//! Shared-secret admission check.
//!
//! When a secret is configured, callers must present it verbatim in the
//! `x-proxy-key` header. The header itself is stripped before forwarding
//! (see [`crate::http::headers`]), so the secret never reaches upstreams.

use axum::http::HeaderMap;

use crate::error::GatewayError;

/// Header carrying the caller's copy of the shared secret.
pub const PROXY_KEY_HEADER: &str = "x-proxy-key";

/// Verify the caller's shared secret, if one is configured.
///
/// An unset or empty secret disables the check entirely. Comparison is
/// exact string equality.
pub fn authorize(headers: &HeaderMap, shared_secret: Option<&str>) -> Result<(), GatewayError> {
    let Some(expected) = shared_secret.filter(|s| !s.is_empty()) else {
        return Ok(());
    };

    let presented = headers
        .get(PROXY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if presented == expected {
        Ok(())
    } else {
        Err(GatewayError::Unauthorized)
    }
}
