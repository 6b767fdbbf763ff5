//! Simulated execution.
//!
//! Stands in for Trader Joe (Avalanche) and Astroport (SEI) contract calls:
//! swaps deduct a fixed slippage, hashes and pool addresses are random, and
//! pool reads return canned reserves.

use async_trait::async_trait;
use rand::RngCore;
use std::time::Duration;

use crate::blockchain::execution::ExecutionStrategy;
use crate::blockchain::types::{
    BridgeReceipt, Chain, ChainError, ChainResult, PoolCreation, PoolInfo, PriceQuote,
    SwapParams, SwapResult,
};
use crate::config::SimulationConfig;

const BPS_DENOMINATOR: u32 = 10_000;
/// Largest amount whose slippage arithmetic stays finite.
const MAX_AMOUNT: f64 = f64::MAX / BPS_DENOMINATOR as f64;

#[derive(Debug, Clone)]
pub struct SimulatedExecution {
    slippage_bps: u32,
    latency: Duration,
}

impl SimulatedExecution {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            slippage_bps: config.slippage_bps.min(BPS_DENOMINATOR),
            latency: Duration::from_millis(config.latency_ms),
        }
    }

    async fn simulate_latency(&self) {
        if self.latency.is_zero() {
            return;
        }
        let base = self.latency.as_millis() as u64;
        let jitter = fastrand::u64(0..=base / 10);
        tokio::time::sleep(Duration::from_millis(base + jitter)).await;
    }
}

impl Default for SimulatedExecution {
    fn default() -> Self {
        Self::new(&SimulationConfig::default())
    }
}

/// Deduct `slippage_bps` from a decimal amount.
pub fn apply_slippage(amount_in: &str, slippage_bps: u32) -> ChainResult<String> {
    let amount = parse_amount(amount_in)?;
    let kept = (BPS_DENOMINATOR - slippage_bps.min(BPS_DENOMINATOR)) as f64;
    let amount_out = amount * kept / BPS_DENOMINATOR as f64;
    if !amount_out.is_finite() {
        return Err(ChainError::InvalidAmount(amount_in.to_string()));
    }
    Ok(amount_out.to_string())
}

/// Parse a strictly positive decimal amount no larger than `MAX_AMOUNT`.
pub fn parse_amount(amount: &str) -> ChainResult<f64> {
    match amount.trim().parse::<f64>() {
        Ok(v) if v > 0.0 && v <= MAX_AMOUNT => Ok(v),
        _ => Err(ChainError::InvalidAmount(amount.to_string())),
    }
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut bytes = [0u8; N];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

#[async_trait]
impl ExecutionStrategy for SimulatedExecution {
    async fn swap(&self, chain: Chain, params: &SwapParams) -> ChainResult<SwapResult> {
        self.simulate_latency().await;
        let amount_out = apply_slippage(&params.amount_in, self.slippage_bps)?;

        tracing::info!(
            chain = %chain,
            token_in = %params.token_in,
            token_out = %params.token_out,
            amount_in = %params.amount_in,
            amount_out = %amount_out,
            recipient = %params.recipient,
            "Executing simulated swap"
        );

        Ok(SwapResult {
            tx_hash: chain.format_hex(&random_bytes::<32>()),
            amount_out,
        })
    }

    async fn create_pool(
        &self,
        chain: Chain,
        token_a: &str,
        token_b: &str,
        fee: &str,
    ) -> ChainResult<PoolCreation> {
        self.simulate_latency().await;
        tracing::info!(chain = %chain, token_a, token_b, fee, "Creating simulated pool");

        Ok(PoolCreation {
            pool_address: chain.format_hex(&random_bytes::<20>()),
            tx_hash: chain.format_hex(&random_bytes::<32>()),
        })
    }

    async fn pool_info(&self, chain: Chain, pool_address: &str) -> ChainResult<PoolInfo> {
        self.simulate_latency().await;
        tracing::debug!(chain = %chain, pool_address, "Reading simulated pool");

        let info = match chain {
            Chain::Avalanche => PoolInfo {
                token0: "AVAX".into(),
                token1: "USDC".into(),
                reserve0: "1000000".into(),
                reserve1: "500000".into(),
                fee: "0.3%".into(),
                tvl: "1500000".into(),
            },
            Chain::Sei => PoolInfo {
                token0: "SEI".into(),
                token1: "USDC".into(),
                reserve0: "2000000".into(),
                reserve1: "1000000".into(),
                fee: "0.3%".into(),
                tvl: "3000000".into(),
            },
        };
        Ok(info)
    }

    async fn price(&self, token: &str) -> ChainResult<PriceQuote> {
        self.simulate_latency().await;
        tracing::debug!(token, "Quoting simulated price");
        Ok(PriceQuote {
            price: 100.0,
            currency: "USD".into(),
        })
    }

    async fn bridge(
        &self,
        from: Chain,
        to: Chain,
        amount: &str,
        token: &str,
    ) -> ChainResult<BridgeReceipt> {
        parse_amount(amount)?;
        self.simulate_latency().await;
        tracing::info!(from = %from, to = %to, amount, token, "Submitting simulated bridge transfer");

        Ok(BridgeReceipt {
            tx_hash: from.format_hex(&random_bytes::<32>()),
            status: "pending".into(),
        })
    }
}
