//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request tracing)
//! - Serve on a bound listener until shutdown
//! - Hand `/proxy` requests to the forwarding engine
//!
//! # Design Decisions
//! - `/` and `/health` answer inline with wildcard CORS, no validation
//! - Unmatched paths render the same typed rejection as the pipeline
//! - The transport is injectable so integration tests run the real
//!   server with a capturing double

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::cors;
use crate::proxy::engine::{self, ForwardingEngine};
use crate::proxy::transport::{HttpTransport, Transport, TransportError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ForwardingEngine>,
}

/// HTTP server for the forwarding gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server with the production transport.
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let transport = Arc::new(HttpTransport::new(&config.upstream)?);
        Ok(Self::with_transport(config, transport))
    }

    /// Create a server with an injected transport (test seam).
    pub fn with_transport(config: GatewayConfig, transport: Arc<dyn Transport>) -> Self {
        let engine = Arc::new(ForwardingEngine::new(config.clone(), transport));
        let router = Self::build_router(AppState { engine });
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(health_handler))
            .route("/health", any(health_handler))
            .route("/proxy", any(proxy_handler))
            .fallback(not_found_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            auth_enabled = self.config.auth_enabled(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Proxy endpoint: the whole pipeline lives in the engine.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.engine.handle(request).await
}

/// Liveness endpoint, also served at `/`. Always 200 with wildcard CORS.
async fn health_handler() -> Response {
    let mut response = Response::new(Body::from("ok"));
    response.headers_mut().extend(cors::headers(None));
    response
}

/// Anything that matched no route.
async fn not_found_handler() -> Response {
    engine::render_error(&GatewayError::RouteNotFound)
}
