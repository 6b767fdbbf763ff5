//! Chain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Handler → registry.rs (chain selector → adapter + breaker)
//!     → avalanche.rs / sei.rs (address checks, balance queries)
//!     → execution.rs (swap / pool strategy, simulated by default)
//! ```
//!
//! # Constraints
//! - Connection handles are created lazily on first use and then reused
//! - Adapters never apply their own deadlines; callers go through `resilience::guarded`
//! - Address syntax is checked before any network call

pub mod avalanche;
pub mod execution;
pub mod registry;
pub mod sei;
pub mod simulation;
pub mod types;

pub use avalanche::AvalancheAdapter;
pub use execution::ExecutionStrategy;
pub use registry::{ChainEntry, ChainRegistry};
pub use sei::SeiAdapter;
pub use simulation::SimulatedExecution;
pub use types::{
    BridgeReceipt, Chain, ChainError, ChainResult, PoolCreation, PoolInfo, PriceQuote, SwapParams,
    SwapResult,
};

use async_trait::async_trait;

/// Uniform surface over one chain.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    fn chain(&self) -> Chain;

    /// Reject addresses that are not syntactically valid on this chain.
    fn validate_address(&self, address: &str) -> ChainResult<()>;

    /// Native balance as a decimal string in whole units.
    async fn get_balance(&self, address: &str) -> ChainResult<String>;

    async fn execute_swap(&self, params: &SwapParams) -> ChainResult<SwapResult>;

    async fn create_pool(&self, token_a: &str, token_b: &str, fee: &str)
        -> ChainResult<PoolCreation>;

    async fn get_pool_info(&self, pool_address: &str) -> ChainResult<PoolInfo>;
}
