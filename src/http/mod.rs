//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request id, body field decoding)
//!     → swap.rs / pools.rs / balance.rs / market.rs / health.rs
//!         → validate input, resolve chain, resilience::guarded(adapter call)
//!     → error.rs (ServiceError → status + {"error": ...})
//!     → Send to client
//! ```

pub mod balance;
pub mod error;
pub mod health;
pub mod market;
pub mod pools;
pub mod request;
pub mod server;
pub mod swap;

pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
