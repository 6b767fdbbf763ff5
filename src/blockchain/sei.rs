//! SEI adapter.
//!
//! Balances come from the Cosmos bank REST endpoint
//! (`/cosmos/bank/v1beta1/balances/{address}/by_denom`). Amounts are in
//! micro units (6 decimals).

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

use crate::blockchain::execution::ExecutionStrategy;
use crate::blockchain::types::{
    Chain, ChainError, ChainResult, PoolCreation, PoolInfo, SwapParams, SwapResult,
};
use crate::blockchain::ChainAdapter;
use crate::config::SeiConfig;

const MICRO_UNITS: u128 = 1_000_000;
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

pub struct SeiAdapter {
    config: SeiConfig,
    client: OnceLock<reqwest::Client>,
    execution: Arc<dyn ExecutionStrategy>,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    balance: Option<Coin>,
}

#[derive(Debug, Deserialize)]
struct Coin {
    amount: String,
}

impl SeiAdapter {
    pub fn new(config: SeiConfig, execution: Arc<dyn ExecutionStrategy>) -> Self {
        Self {
            config,
            client: OnceLock::new(),
            execution,
        }
    }

    fn client(&self) -> ChainResult<&reqwest::Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("cswap-backend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChainError::Config(e.to_string()))?;

        tracing::info!(rest_url = %self.config.rest_url, "SEI REST client initialized");
        Ok(self.client.get_or_init(|| client))
    }

    fn balance_url(&self, address: &str) -> String {
        format!(
            "{}/cosmos/bank/v1beta1/balances/{}/by_denom?denom={}",
            self.config.rest_url.trim_end_matches('/'),
            address,
            self.config.denom
        )
    }
}

/// Check the `sei1` prefix and bech32 data charset.
pub fn validate_sei_address(address: &str) -> ChainResult<()> {
    let valid = address
        .strip_prefix("sei1")
        .map(|data| {
            (38..=58).contains(&data.len()) && data.chars().all(|c| BECH32_CHARSET.contains(c))
        })
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(ChainError::InvalidAddress {
            chain: Chain::Sei,
            address: address.to_string(),
        })
    }
}

/// Render a micro-unit integer amount as a decimal string ("1500000" → "1.5").
pub fn format_micro(amount: &str) -> ChainResult<String> {
    let value: u128 = amount
        .trim()
        .parse()
        .map_err(|_| ChainError::Execution(format!("Unexpected balance amount '{}'", amount)))?;

    let whole = value / MICRO_UNITS;
    let frac = format!("{:06}", value % MICRO_UNITS);
    let frac = frac.trim_end_matches('0');

    if frac.is_empty() {
        Ok(format!("{}.0", whole))
    } else {
        Ok(format!("{}.{}", whole, frac))
    }
}

#[async_trait]
impl ChainAdapter for SeiAdapter {
    fn chain(&self) -> Chain {
        Chain::Sei
    }

    fn validate_address(&self, address: &str) -> ChainResult<()> {
        validate_sei_address(address)
    }

    async fn get_balance(&self, address: &str) -> ChainResult<String> {
        validate_sei_address(address)?;
        let url = self.balance_url(address);

        let response = self
            .client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Network(format!(
                "SEI REST endpoint returned {}",
                status
            )));
        }

        let body: BalanceResponse = response
            .json()
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;

        match body.balance {
            Some(coin) => format_micro(&coin.amount),
            None => Ok("0.0".to_string()),
        }
    }

    async fn execute_swap(&self, params: &SwapParams) -> ChainResult<SwapResult> {
        self.execution.swap(Chain::Sei, params).await
    }

    async fn create_pool(
        &self,
        token_a: &str,
        token_b: &str,
        fee: &str,
    ) -> ChainResult<PoolCreation> {
        self.execution.create_pool(Chain::Sei, token_a, token_b, fee).await
    }

    async fn get_pool_info(&self, pool_address: &str) -> ChainResult<PoolInfo> {
        self.execution.pool_info(Chain::Sei, pool_address).await
    }
}
