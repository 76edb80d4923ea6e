//! Upstream dispatch capability.
//!
//! # Responsibilities
//! - Define the fetch-like seam the forwarding engine dispatches through
//! - Provide the production implementation backed by `reqwest`
//! - Keep request and response bodies streaming end to end
//!
//! # Design Decisions
//! - The seam is a trait so tests can substitute a capturing double
//! - Redirects are followed by the transport (limit 10); the engine never
//!   sees intermediate hops
//! - Failures collapse to a single message type; the engine renders every
//!   one of them as 502

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, StatusCode};
use thiserror::Error;
use url::Url;

use crate::config::schema::UpstreamConfig;

/// A sanitized request ready for dispatch to the target.
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Streaming pass-through of the client body; `None` for GET/HEAD.
    pub body: Option<Body>,
}

/// An upstream response with its body still streaming.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

/// A transport-level failure: connect error, timeout, redirect loop.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // Flatten the cause chain so the 502 body names the real failure,
        // not just "error sending request".
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        Self { message }
    }
}

/// The provided fetch-like capability the engine dispatches through.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn dispatch(&self, request: OutboundRequest)
        -> Result<UpstreamResponse, TransportError>;
}

/// Production transport over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build the shared upstream client.
    ///
    /// The client follows redirects and applies the configured connect
    /// timeout; both surface to callers only as [`TransportError`].
    pub fn new(config: &UpstreamConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .connect_timeout(std::time::Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn dispatch(
        &self,
        request: OutboundRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = Body::from_stream(response.bytes_stream());

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
