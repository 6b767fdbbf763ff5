//! Chain-specific types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Supported chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[serde(alias = "avax")]
    Avalanche,
    Sei,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Avalanche, Chain::Sei];

    /// Parse a chain selector as sent by clients ("avalanche", "avax", "sei").
    pub fn parse(value: &str) -> Option<Chain> {
        match value {
            "avalanche" | "avax" => Some(Chain::Avalanche),
            "sei" => Some(Chain::Sei),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Avalanche => "avalanche",
            Chain::Sei => "sei",
        }
    }

    /// Recipient used when a swap request omits one.
    pub fn default_recipient(self) -> &'static str {
        match self {
            Chain::Avalanche => "0x0000000000000000000000000000000000000000",
            Chain::Sei => "sei1test",
        }
    }

    /// Render raw bytes the way this chain's explorers display hashes.
    pub fn format_hex(self, bytes: &[u8]) -> String {
        let hex = alloy::primitives::hex::encode(bytes);
        match self {
            Chain::Avalanche => format!("0x{}", hex),
            Chain::Sei => hex,
        }
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Swap parameters after request validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapParams {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResult {
    pub tx_hash: String,
    pub amount_out: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolCreation {
    pub pool_address: String,
    pub tx_hash: String,
}

/// On-chain pool state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub token0: String,
    pub token1: String,
    pub reserve0: String,
    pub reserve1: String,
    pub fee: String,
    pub tvl: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeReceipt {
    pub tx_hash: String,
    pub status: String,
}

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("Invalid {chain} address: {address}")]
    InvalidAddress { chain: Chain, address: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Network(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Adapter misconfigured: {0}")]
    Config(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_parse() {
        assert_eq!(Chain::parse("avalanche"), Some(Chain::Avalanche));
        assert_eq!(Chain::parse("avax"), Some(Chain::Avalanche));
        assert_eq!(Chain::parse("sei"), Some(Chain::Sei));
        assert_eq!(Chain::parse("SEI"), None);
        assert_eq!(Chain::parse("bogus"), None);
        assert_eq!(Chain::parse(""), None);
    }

    #[test]
    fn test_format_hex_per_chain() {
        assert_eq!(Chain::Avalanche.format_hex(&[0xab, 0x01]), "0xab01");
        assert_eq!(Chain::Sei.format_hex(&[0xab, 0x01]), "ab01");
    }

    #[test]
    fn test_chain_serde() {
        assert_eq!(serde_json::to_string(&Chain::Avalanche).unwrap(), "\"avalanche\"");
        let chain: Chain = serde_json::from_str("\"avax\"").unwrap();
        assert_eq!(chain, Chain::Avalanche);
    }

    #[test]
    fn test_error_display() {
        let err = ChainError::InvalidAddress { chain: Chain::Sei, address: "xyz".into() };
        assert_eq!(err.to_string(), "Invalid sei address: xyz");
    }
}
