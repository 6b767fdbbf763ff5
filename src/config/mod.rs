//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, TIMEOUT_*, CIRCUIT_BREAKER_*, ...)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ServiceConfig;
pub use schema::{
    AdminConfig, AvalancheConfig, ChainsConfig, CircuitBreakerConfig, CorsConfig,
    ListenerConfig, ObservabilityConfig, RateLimitConfig, SeiConfig, SimulationConfig,
    StorageConfig, TimeoutConfig,
};
