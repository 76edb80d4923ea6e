//! CORS Forwarding Gateway
//!
//! A single-endpoint HTTP gateway that fetches caller-specified URLs on
//! behalf of browser clients, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌───────────────────────────────────────────────┐
//!                    │                CORS GATEWAY                    │
//!                    │                                                │
//!   Client Request   │  ┌────────┐   ┌───────────┐   ┌────────────┐  │
//!   ─────────────────┼─▶│  http  │──▶│ validator │──▶│   engine   │  │
//!                    │  │ server │   │ (admit)   │   │ (sanitize) │  │
//!                    │  └────────┘   └───────────┘   └─────┬──────┘  │
//!                    │                                      │         │
//!                    │                                      ▼         │
//!   Client Response  │  ┌────────┐   ┌───────────┐   ┌────────────┐  │
//!   ◀────────────────┼──│ cors + │◀──│  engine   │◀──│ transport  │◀─┼── Target
//!                    │  │headers │   │ (relay)   │   │ (reqwest)  │  │    Server
//!                    │  └────────┘   └───────────┘   └────────────┘  │
//!                    │                                                │
//!                    │  config · security (host guard, auth) ·        │
//!                    │  lifecycle (shutdown) · tracing                │
//!                    └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cors_gateway::config::load_config;
use cors_gateway::http::HttpServer;
use cors_gateway::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "cors-gateway")]
#[command(about = "Single-endpoint CORS forwarding gateway", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    // Initialize tracing subscriber; RUST_LOG wins over the config level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "cors_gateway={},tower_http=info",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("cors-gateway v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_enabled = config.auth_enabled(),
        connect_timeout_secs = config.upstream.connect_timeout_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_ctrl_c());

    let server = HttpServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
