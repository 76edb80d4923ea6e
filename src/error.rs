//! Request rejection taxonomy.
//!
//! Every variant is terminal: it maps to exactly one HTTP status and one
//! plain-text body (the `Display` string). Nothing here is retried.

use axum::http::StatusCode;
use thiserror::Error;

use crate::proxy::transport::TransportError;

/// Why a proxy request was rejected or a forward failed.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request path matched no route.
    #[error("Not found")]
    RouteNotFound,

    /// Method outside the allowed set.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The `url` query parameter was absent.
    #[error("Missing ?url=")]
    MissingTarget,

    /// The `url` query parameter did not parse as an absolute URL.
    #[error("Invalid target URL")]
    InvalidTarget,

    /// Target scheme was neither http nor https.
    #[error("Only http/https allowed")]
    UnsupportedScheme,

    /// Target hostname is loopback, private, link-local, or metadata space.
    #[error("Forbidden host")]
    ForbiddenHost,

    /// Shared secret configured but missing or mismatched.
    #[error("Unauthorized")]
    Unauthorized,

    /// The transport reported a failure before or during relay.
    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] TransportError),
}

impl GatewayError {
    /// The HTTP status this rejection renders as.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::RouteNotFound => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::MissingTarget
            | GatewayError::InvalidTarget
            | GatewayError::UnsupportedScheme => StatusCode::BAD_REQUEST,
            GatewayError::ForbiddenHost => StatusCode::FORBIDDEN,
            GatewayError::Unauthorized => StatusCode::UNAUTHORIZED,
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}
