//! Avalanche C-Chain adapter.
//!
//! Balances are read over JSON-RPC through an alloy provider; swaps and pool
//! operations are delegated to the configured execution strategy.

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::primitives::utils::format_ether;
use async_trait::async_trait;
use std::sync::{Arc, OnceLock};

use crate::blockchain::execution::ExecutionStrategy;
use crate::blockchain::types::{
    Chain, ChainError, ChainResult, PoolCreation, PoolInfo, SwapParams, SwapResult,
};
use crate::blockchain::ChainAdapter;
use crate::config::AvalancheConfig;

pub struct AvalancheAdapter {
    config: AvalancheConfig,
    provider: OnceLock<Arc<dyn Provider + Send + Sync>>,
    execution: Arc<dyn ExecutionStrategy>,
}

impl AvalancheAdapter {
    pub fn new(config: AvalancheConfig, execution: Arc<dyn ExecutionStrategy>) -> Self {
        Self {
            config,
            provider: OnceLock::new(),
            execution,
        }
    }

    fn provider(&self) -> ChainResult<&Arc<dyn Provider + Send + Sync>> {
        if let Some(provider) = self.provider.get() {
            return Ok(provider);
        }

        let url: url::Url = self.config.rpc_url.parse().map_err(|e| {
            ChainError::Config(format!("Invalid RPC URL '{}': {}", self.config.rpc_url, e))
        })?;

        Ok(self.provider.get_or_init(|| {
            tracing::info!(
                rpc_url = %self.config.rpc_url,
                chain_id = self.config.chain_id,
                "Avalanche provider initialized"
            );
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>
        }))
    }
}

/// Parse a `0x`-prefixed 20-byte hex address.
pub fn parse_address(address: &str) -> ChainResult<Address> {
    let invalid = || ChainError::InvalidAddress {
        chain: Chain::Avalanche,
        address: address.to_string(),
    };

    if !address.starts_with("0x") {
        return Err(invalid());
    }
    address.parse::<Address>().map_err(|_| invalid())
}

#[async_trait]
impl ChainAdapter for AvalancheAdapter {
    fn chain(&self) -> Chain {
        Chain::Avalanche
    }

    fn validate_address(&self, address: &str) -> ChainResult<()> {
        parse_address(address).map(|_| ())
    }

    async fn get_balance(&self, address: &str) -> ChainResult<String> {
        let address = parse_address(address)?;
        let provider = self.provider()?;

        let wei = provider
            .get_balance(address)
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;

        Ok(format_ether(wei))
    }

    async fn execute_swap(&self, params: &SwapParams) -> ChainResult<SwapResult> {
        self.execution.swap(Chain::Avalanche, params).await
    }

    async fn create_pool(
        &self,
        token_a: &str,
        token_b: &str,
        fee: &str,
    ) -> ChainResult<PoolCreation> {
        self.execution
            .create_pool(Chain::Avalanche, token_a, token_b, fee)
            .await
    }

    async fn get_pool_info(&self, pool_address: &str) -> ChainResult<PoolInfo> {
        self.execution.pool_info(Chain::Avalanche, pool_address).await
    }
}
