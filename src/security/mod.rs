//! Security boundary enforcement.
//!
//! # Data Flow
//! ```text
//! Target URL hostname
//!     → host_guard.rs (private/loopback/metadata classification by name)
//!
//! Inbound request headers
//!     → auth.rs (shared-secret comparison, only when configured)
//! ```
//!
//! # Design Decisions
//! - Both checks are pure functions over request data; no I/O, no state
//! - Host classification never resolves DNS (perimeter filter, not a full
//!   SSRF defense)
//! - Fail closed: reject on any check failure

pub mod auth;
pub mod host_guard;
