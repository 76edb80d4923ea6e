//! Lifecycle management.
//!
//! # Design Decisions
//! - Single broadcast channel: every long-running task subscribes once
//! - Ctrl+C is the only shutdown source in the binary; tests trigger
//!   programmatically

pub mod shutdown;

pub use shutdown::Shutdown;
