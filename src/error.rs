//! Service-wide error type.
//!
//! Adapters raise `ChainError`, the resilience layer adds `TimeoutError` and
//! `CircuitOpenError`; everything converges here. The HTTP layer is the only
//! place these are turned into status codes (see `http::error`).

use thiserror::Error;

use crate::blockchain::ChainError;
use crate::resilience::{CircuitOpenError, TimeoutError};

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Missing or malformed request fields.
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error(transparent)]
    Timeout(#[from] TimeoutError),

    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpenError),

    /// The upstream node or API could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The adapter reached the chain but the operation failed.
    #[error("{0}")]
    Adapter(String),

    /// Catalog snapshot could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Unauthorized")]
    Unauthorized,
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) | ServiceError::UnsupportedChain(_) => "validation",
            ServiceError::Timeout(_) => "timeout",
            ServiceError::CircuitOpen(_) => "breaker-open",
            ServiceError::Network(_) => "network",
            ServiceError::Adapter(_) => "adapter",
            ServiceError::Storage(_) => "storage",
            ServiceError::Unauthorized => "unauthorized",
        }
    }
}

impl From<ChainError> for ServiceError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::InvalidAddress { .. } | ChainError::InvalidAmount(_) => {
                ServiceError::Validation(e.to_string())
            }
            ChainError::Network(msg) => ServiceError::Network(msg),
            ChainError::Execution(_) | ChainError::Config(_) => ServiceError::Adapter(e.to_string()),
        }
    }
}
