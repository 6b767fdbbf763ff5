//! Execution strategy seam.
//!
//! Adapters delegate state-changing operations (swaps, pool creation) and
//! contract reads to an `ExecutionStrategy`. The shipped implementation is
//! `SimulatedExecution`; a strategy that submits real transactions plugs in
//! behind the same trait.

use async_trait::async_trait;

use crate::blockchain::types::{
    BridgeReceipt, Chain, ChainResult, PoolCreation, PoolInfo, PriceQuote, SwapParams, SwapResult,
};

#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    /// Submit a swap on `chain`.
    async fn swap(&self, chain: Chain, params: &SwapParams) -> ChainResult<SwapResult>;

    /// Deploy a pool for a token pair.
    async fn create_pool(
        &self,
        chain: Chain,
        token_a: &str,
        token_b: &str,
        fee: &str,
    ) -> ChainResult<PoolCreation>;

    /// Read pool reserves and fee.
    async fn pool_info(&self, chain: Chain, pool_address: &str) -> ChainResult<PoolInfo>;

    /// Current USD price for a token.
    async fn price(&self, token: &str) -> ChainResult<PriceQuote>;

    /// Start a cross-chain transfer.
    async fn bridge(
        &self,
        from: Chain,
        to: Chain,
        amount: &str,
        token: &str,
    ) -> ChainResult<BridgeReceipt>;
}
