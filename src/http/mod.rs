//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, trace layer)
//!     → / and /health answered inline; /proxy handed to the engine
//!     → headers.rs + cors.rs shape every response's header set
//!     → Send to client
//! ```

pub mod cors;
pub mod headers;
pub mod server;

pub use server::HttpServer;
