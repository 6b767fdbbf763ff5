//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and URLs.
//! Returns all validation errors, not just the first.

use std::net::SocketAddr;
use crate::config::schema::ServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("not a socket address: {}", config.listener.bind_address),
        ));
    }
    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be > 0"));
    }

    let timeouts = [
        ("timeouts.api_request_ms", config.timeouts.api_request_ms),
        ("timeouts.web3_call_ms", config.timeouts.web3_call_ms),
        ("timeouts.cross_chain_ms", config.timeouts.cross_chain_ms),
        ("timeouts.graceful_shutdown_ms", config.timeouts.graceful_shutdown_ms),
        ("timeouts.admin_query_ms", config.timeouts.admin_query_ms),
    ];
    for (field, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be > 0"));
        }
    }

    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::new("circuit_breaker.failure_threshold", "must be >= 1"));
    }

    let urls = [
        ("chains.avalanche.rpc_url", &config.chains.avalanche.rpc_url),
        ("chains.sei.rest_url", &config.chains.sei.rest_url),
    ];
    for (field, value) in urls {
        if let Err(e) = url::Url::parse(value) {
            errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
        }
    }

    if config.simulation.slippage_bps >= 10_000 {
        errors.push(ValidationError::new("simulation.slippage_bps", "must be < 10000"));
    }

    if config.rate_limit.enabled && (config.rate_limit.max_requests == 0 || config.rate_limit.window_secs == 0) {
        errors.push(ValidationError::new("rate_limit", "max_requests and window_secs must be > 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("expected 'pretty' or 'json', got '{}'", config.observability.log_format),
        ));
    }

    if config.storage.ledger_capacity == 0 {
        errors.push(ValidationError::new("storage.ledger_capacity", "must be > 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
