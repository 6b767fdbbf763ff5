//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Trigger → server stops accepting → drain (bounded) → cleanup (bounded) → exit
//! ```
//!
//! # Design Decisions
//! - Both the drain and the cleanup are bounded by the graceful-shutdown timeout
//! - A failed cleanup is logged and reported, never retried

pub mod shutdown;
pub mod signals;

pub use shutdown::{cleanup, Shutdown};
