//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (per-IP token bucket, 429 when exhausted)
//!     → body limit / request timeout (tower-http, wired in http::server)
//!     → handler
//! Outgoing response:
//!     → headers.rs (security headers, CORS)
//! ```
//!
//! # Design Decisions
//! - Reject early: rate limiting runs before body parsing
//! - No trust in client input

pub mod headers;
pub mod rate_limit;
