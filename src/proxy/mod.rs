//! Forwarding pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming /proxy request
//!     → validator.rs (admission ladder → TargetSpec | Preflight | error)
//!     → engine.rs (sanitize headers, build outbound request)
//!     → transport.rs (dispatch; redirects followed; bodies stream)
//!     → engine.rs (re-assemble: upstream headers + CORS + no-store)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - The transport is a trait seam so the whole pipeline is testable with
//!   a capturing double, without opening sockets
//! - A request either forwards completely or is rejected before any
//!   upstream contact; the only post-contact failure is the 502 path

pub mod engine;
pub mod transport;
pub mod validator;

pub use engine::ForwardingEngine;
pub use transport::{HttpTransport, Transport};
