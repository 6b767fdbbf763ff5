//! Configuration loading from disk and the environment.

use std::path::Path;
use std::fs;
use thiserror::Error;
use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Parse error: {0}")]
    Parse(toml::de::Error),
    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Read a TOML file; missing keys take their defaults.
fn parse_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Build the runtime configuration: file (or defaults), then environment
/// overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(p) => parse_file(p)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("HOST");
    let port = lookup("PORT");
    if host.is_some() || port.is_some() {
        let (current_host, current_port) = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(h, p)| (h.to_string(), p.to_string()))
            .unwrap_or_else(|| (config.listener.bind_address.clone(), "8000".to_string()));
        let port = match port {
            Some(p) => parse_env::<u16>("PORT", p)?.to_string(),
            None => current_port,
        };
        config.listener.bind_address = format!("{}:{}", host.unwrap_or(current_host), port);
    }

    if let Some(v) = lookup("TIMEOUT_API_REQUEST") {
        config.timeouts.api_request_ms = parse_env("TIMEOUT_API_REQUEST", v)?;
    }
    if let Some(v) = lookup("TIMEOUT_WEB3_CALL") {
        config.timeouts.web3_call_ms = parse_env("TIMEOUT_WEB3_CALL", v)?;
    }
    if let Some(v) = lookup("TIMEOUT_CROSS_CHAIN") {
        config.timeouts.cross_chain_ms = parse_env("TIMEOUT_CROSS_CHAIN", v)?;
    }
    if let Some(v) = lookup("TIMEOUT_GRACEFUL_SHUTDOWN") {
        config.timeouts.graceful_shutdown_ms = parse_env("TIMEOUT_GRACEFUL_SHUTDOWN", v)?;
    }
    if let Some(v) = lookup("CIRCUIT_BREAKER_THRESHOLD") {
        config.circuit_breaker.failure_threshold = parse_env("CIRCUIT_BREAKER_THRESHOLD", v)?;
    }
    if let Some(v) = lookup("CIRCUIT_BREAKER_RECOVERY_TIME") {
        config.circuit_breaker.recovery_ms = parse_env("CIRCUIT_BREAKER_RECOVERY_TIME", v)?;
    }

    if let Some(v) = lookup("AVALANCHE_RPC_URL") {
        config.chains.avalanche.rpc_url = v;
    }
    if let Some(v) = lookup("SEI_REST_URL") {
        config.chains.sei.rest_url = v;
    }
    if let Some(v) = lookup("FRONTEND_URL") {
        config.cors.allowed_origin = v;
    }
    if let Some(v) = lookup("LOG_FORMAT") {
        config.observability.log_format = v;
    }
    if let Some(v) = lookup("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = v;
    }
    if let Some(v) = lookup("ADMIN_API_KEY") {
        config.admin.api_key = Some(v).filter(|k| !k.is_empty());
    }

    Ok(())
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}
