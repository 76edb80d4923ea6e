//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use http_body_util::BodyExt;
use tokio::net::TcpListener;

use cors_gateway::config::GatewayConfig;
use cors_gateway::http::HttpServer;
use cors_gateway::lifecycle::Shutdown;
use cors_gateway::proxy::transport::{
    OutboundRequest, Transport, TransportError, UpstreamResponse,
};

/// An outbound call observed by the mock transport.
///
/// Not every test binary inspects every field.
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// Transport double: records each outbound request and serves a canned
/// reply (or a canned failure).
pub struct MockTransport {
    status: StatusCode,
    reply_headers: Vec<(String, String)>,
    reply_body: &'static str,
    failure: Option<String>,
    recorded: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn replying(status: u16, headers: &[(&str, &str)], body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::from_u16(status).unwrap(),
            reply_headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            reply_body: body,
            failure: None,
            recorded: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            status: StatusCode::OK,
            reply_headers: Vec::new(),
            reply_body: "",
            failure: Some(message.to_string()),
            recorded: Mutex::new(Vec::new()),
        })
    }

    /// Number of outbound dispatches observed.
    pub fn dispatch_count(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    /// Run a closure over the recorded requests.
    #[allow(dead_code)]
    pub fn with_recorded<R>(&self, f: impl FnOnce(&[RecordedRequest]) -> R) -> R {
        f(&self.recorded.lock().unwrap())
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn dispatch(
        &self,
        request: OutboundRequest,
    ) -> Result<UpstreamResponse, TransportError> {
        let body = match request.body {
            Some(body) => Some(body.collect().await.expect("request body").to_bytes()),
            None => None,
        };
        self.recorded.lock().unwrap().push(RecordedRequest {
            method: request.method,
            url: request.url.to_string(),
            headers: request.headers,
            body,
        });

        if let Some(message) = &self.failure {
            return Err(TransportError::new(message.clone()));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.reply_headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        Ok(UpstreamResponse {
            status: self.status,
            headers,
            body: Body::from(self.reply_body),
        })
    }
}

/// Boot the gateway on an ephemeral loopback port.
///
/// The returned `Shutdown` must be held for the test's lifetime; dropping
/// it drains the server.
pub async fn spawn_gateway(
    config: GatewayConfig,
    transport: Arc<dyn Transport>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::with_transport(config, transport);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never reuses connections and ignores system proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
