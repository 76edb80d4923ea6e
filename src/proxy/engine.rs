//! Forwarding orchestration.
//!
//! # Responsibilities
//! - Run admission, render preflight and rejections immediately
//! - Build the sanitized outbound request and dispatch it
//! - Re-assemble the upstream response with CORS metadata for the client
//!
//! # Design Decisions
//! - Bodies stream through untouched in both directions; nothing is
//!   buffered, so memory use stays flat for large payloads
//! - No retries: a transport failure is one 502, rendered with the
//!   failure cause in the body
//! - Dropping the handler future (client disconnect) drops the dispatch
//!   future with it, releasing the upstream connection

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::{cors, headers};
use crate::proxy::transport::{OutboundRequest, Transport};
use crate::proxy::validator::{self, Admission};

/// The validate → dispatch → re-assemble pipeline behind `/proxy`.
pub struct ForwardingEngine {
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
}

impl ForwardingEngine {
    pub fn new(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Handle one proxy request end to end.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let request_id = Uuid::new_v4();
        let (parts, body) = request.into_parts();
        let origin = parts.headers.get(header::ORIGIN).cloned();

        let admission = validator::admit(
            &parts.method,
            parts.uri.query(),
            &parts.headers,
            self.config.auth.proxy_key.as_deref(),
        );

        let target = match admission {
            Ok(Admission::Preflight) => return preflight(origin.as_ref()),
            Ok(Admission::Forward(target)) => target,
            Err(err) => {
                tracing::debug!(
                    request_id = %request_id,
                    method = %parts.method,
                    status = %err.status(),
                    error = %err,
                    "Request rejected"
                );
                return render_error(&err);
            }
        };

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            target = %target.url,
            "Forwarding request"
        );

        // Bodies on GET/HEAD are never forwarded.
        let body = if parts.method == Method::GET || parts.method == Method::HEAD {
            None
        } else {
            Some(body)
        };

        let outbound = OutboundRequest {
            method: parts.method,
            url: target.url,
            headers: headers::filter_outbound(&parts.headers),
            body,
        };

        match self.transport.dispatch(outbound).await {
            Ok(upstream) => {
                let mut response = Response::new(upstream.body);
                *response.status_mut() = upstream.status;
                *response.headers_mut() =
                    headers::filter_inbound(&upstream.headers, origin.as_ref());
                response
            }
            Err(err) => {
                tracing::error!(
                    request_id = %request_id,
                    error = %err,
                    "Upstream dispatch failed"
                );
                render_error(&GatewayError::Upstream(err))
            }
        }
    }
}

/// 204 preflight answer, echoing the caller's origin.
fn preflight(origin: Option<&HeaderValue>) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    response.headers_mut().extend(cors::headers(origin));
    response
}

/// Render a rejection: fixed status, plain-text body, wildcard CORS.
pub(crate) fn render_error(err: &GatewayError) -> Response {
    let mut response = Response::new(Body::from(err.to_string()));
    *response.status_mut() = err.status();
    response.headers_mut().extend(cors::headers(None));
    response
}
