//! cswap DEX backend library.
//!
//! HTTP API for swap, pool, balance, price and bridge operations across the
//! Avalanche and SEI chains. Every chain call runs behind a per-dependency
//! circuit breaker and a deadline.

pub mod admin;
pub mod blockchain;
pub mod catalog;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod security;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;
