//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the backend.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on the gap left between a guarded call's deadline and the
/// request deadline.
const REQUEST_HEADROOM: Duration = Duration::from_millis(100);

/// Root configuration for the DEX backend.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Deadlines for requests, chain calls and shutdown.
    pub timeouts: TimeoutConfig,

    /// Shared settings for every circuit breaker.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Per-chain RPC endpoints.
    pub chains: ChainsConfig,

    /// Simulated execution parameters.
    pub simulation: SimulationConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub admin: AdminConfig,

    pub storage: StorageConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Timeout configuration, all values in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request deadline enforced by the HTTP layer.
    pub api_request_ms: u64,

    /// Budget for a single chain adapter call.
    pub web3_call_ms: u64,

    /// Budget for cross-chain bridge operations.
    pub cross_chain_ms: u64,

    /// Upper bound for draining connections and cleanup at shutdown.
    pub graceful_shutdown_ms: u64,

    /// Budget for admin, catalog and health queries.
    pub admin_query_ms: u64,
}

impl TimeoutConfig {
    pub fn api_request(&self) -> Duration {
        Duration::from_millis(self.api_request_ms)
    }

    pub fn web3_call(&self) -> Duration {
        Duration::from_millis(self.web3_call_ms)
    }

    pub fn cross_chain(&self) -> Duration {
        Duration::from_millis(self.cross_chain_ms)
    }

    pub fn graceful_shutdown(&self) -> Duration {
        Duration::from_millis(self.graceful_shutdown_ms)
    }

    pub fn admin_query(&self) -> Duration {
        Duration::from_millis(self.admin_query_ms)
    }

    /// Deadline for a guarded chain call, kept inside the request deadline so
    /// the call settles (and is counted by its breaker) before the request is
    /// abandoned.
    pub fn web3_budget(&self) -> Duration {
        self.within_request(self.web3_call())
    }

    /// Same as [`web3_budget`](Self::web3_budget) for bridge operations.
    pub fn bridge_budget(&self) -> Duration {
        self.within_request(self.cross_chain())
    }

    fn within_request(&self, budget: Duration) -> Duration {
        let request = self.api_request();
        let headroom = (request / 10).min(REQUEST_HEADROOM);
        budget.min(request.saturating_sub(headroom))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            api_request_ms: 10_000,
            web3_call_ms: 15_000,
            cross_chain_ms: 30_000,
            graceful_shutdown_ms: 30_000,
            admin_query_ms: 5_000,
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures that open the circuit.
    pub failure_threshold: u32,

    /// Cooldown before an open circuit lets a probe through, in milliseconds.
    pub recovery_ms: u64,
}

impl CircuitBreakerConfig {
    pub fn recovery_period(&self) -> Duration {
        Duration::from_millis(self.recovery_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 3,
            recovery_ms: 60_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ChainsConfig {
    pub avalanche: AvalancheConfig,
    pub sei: SeiConfig,
}

/// Avalanche C-Chain endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AvalancheConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// EVM chain id (43114 mainnet, 43113 Fuji).
    pub chain_id: u64,
}

impl Default for AvalancheConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.avax.network/ext/bc/C/rpc".to_string(),
            chain_id: 43114,
        }
    }
}

/// SEI endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SeiConfig {
    /// Cosmos REST (LCD) endpoint used for bank queries.
    pub rest_url: String,

    /// Native denomination (micro units).
    pub denom: String,
}

impl Default for SeiConfig {
    fn default() -> Self {
        Self {
            rest_url: "https://sei-api.polkachu.com".to_string(),
            denom: "usei".to_string(),
        }
    }
}

/// Parameters of the simulated execution strategy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Slippage deducted from every simulated swap, in basis points.
    pub slippage_bps: u32,

    /// Artificial latency added to every simulated call, in milliseconds.
    pub latency_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            slippage_bps: 100,
            latency_ms: 0,
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Requests allowed per client IP within one window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin for the front end, or "*".
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Bearer token required on /api/admin routes. Open when unset.
    pub api_key: Option<String>,
}

/// Catalog storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot written at shutdown and loaded at startup.
    pub snapshot_path: Option<String>,

    /// Maximum transactions kept in the ledger.
    pub ledger_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            ledger_capacity: 1000,
        }
    }
}
