//! Request admission.
//!
//! # Responsibilities
//! - Decide, before any upstream contact, whether a proxy request may be
//!   forwarded
//! - Produce the parsed [`TargetSpec`] for admitted requests
//! - Short-circuit preflight requests before every other check
//!
//! # Design Decisions
//! - Checks run in a fixed order; the first failure wins and each failure
//!   is a distinct [`GatewayError`]
//! - The validator never renders responses; the engine wraps every
//!   rejection with CORS metadata
//! - Pure function over request data: deterministic and trivially testable

use axum::http::{HeaderMap, Method};
use url::{form_urlencoded, Url};

use crate::error::GatewayError;
use crate::http::cors::ALLOWED_METHODS;
use crate::security::{auth, host_guard};

/// The admitted forwarding target, parsed from the `url` query parameter.
///
/// Lives for one request only. The [`Url`] carries the validated scheme,
/// hostname, and full reconstructed form.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub url: Url,
}

/// Outcome of admission for a request that was not rejected.
pub enum Admission {
    /// CORS preflight: answer 204 directly, no target involved.
    Preflight,
    /// Forward to the validated target.
    Forward(TargetSpec),
}

/// Run the admission ladder for a request to the proxy endpoint.
///
/// `shared_secret` is the process-wide key; `None` or empty disables the
/// auth check. Route matching happens upstream in the router, so an
/// unmatched path never reaches this function.
pub fn admit(
    method: &Method,
    query: Option<&str>,
    headers: &HeaderMap,
    shared_secret: Option<&str>,
) -> Result<Admission, GatewayError> {
    // Preflight bypasses validation entirely.
    if method == Method::OPTIONS {
        return Ok(Admission::Preflight);
    }

    if !ALLOWED_METHODS.contains(method) {
        return Err(GatewayError::MethodNotAllowed);
    }

    let target = last_query_value(query, "url").ok_or(GatewayError::MissingTarget)?;

    let url = Url::parse(&target).map_err(|_| GatewayError::InvalidTarget)?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(GatewayError::UnsupportedScheme);
    }

    if host_guard::is_forbidden(url.host_str().unwrap_or_default()) {
        return Err(GatewayError::ForbiddenHost);
    }

    auth::authorize(headers, shared_secret)?;

    Ok(Admission::Forward(TargetSpec { url }))
}

/// Extract a query parameter; the last occurrence wins on duplicates.
fn last_query_value(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .last()
}
