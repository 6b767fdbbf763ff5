//! Adapter and breaker lookup by chain.

use std::sync::Arc;

use crate::blockchain::execution::ExecutionStrategy;
use crate::blockchain::types::Chain;
use crate::blockchain::{AvalancheAdapter, ChainAdapter, SeiAdapter};
use crate::config::{ChainsConfig, CircuitBreakerConfig};
use crate::error::ServiceError;
use crate::resilience::CircuitBreaker;

/// One chain's adapter together with the breaker guarding it.
pub struct ChainEntry {
    pub adapter: Arc<dyn ChainAdapter>,
    pub breaker: CircuitBreaker,
}

pub struct ChainRegistry {
    avalanche: ChainEntry,
    sei: ChainEntry,
}

impl ChainRegistry {
    /// Build both adapters over a shared execution strategy.
    pub fn new(
        chains: &ChainsConfig,
        breaker: &CircuitBreakerConfig,
        execution: Arc<dyn ExecutionStrategy>,
    ) -> Self {
        Self::from_adapters(
            Arc::new(AvalancheAdapter::new(chains.avalanche.clone(), execution.clone())),
            Arc::new(SeiAdapter::new(chains.sei.clone(), execution)),
            breaker,
        )
    }

    pub fn from_adapters(
        avalanche: Arc<dyn ChainAdapter>,
        sei: Arc<dyn ChainAdapter>,
        breaker: &CircuitBreakerConfig,
    ) -> Self {
        Self {
            avalanche: ChainEntry {
                adapter: avalanche,
                breaker: CircuitBreaker::new(Chain::Avalanche.as_str(), breaker),
            },
            sei: ChainEntry {
                adapter: sei,
                breaker: CircuitBreaker::new(Chain::Sei.as_str(), breaker),
            },
        }
    }

    pub fn get(&self, chain: Chain) -> &ChainEntry {
        match chain {
            Chain::Avalanche => &self.avalanche,
            Chain::Sei => &self.sei,
        }
    }

    /// Resolve a chain selector as sent by a client.
    pub fn resolve(&self, raw: &str) -> Result<(Chain, &ChainEntry), ServiceError> {
        Chain::parse(raw)
            .map(|chain| (chain, self.get(chain)))
            .ok_or_else(|| ServiceError::UnsupportedChain(raw.to_string()))
    }

    pub fn entries(&self) -> impl Iterator<Item = (Chain, &ChainEntry)> {
        Chain::ALL.into_iter().map(move |chain| (chain, self.get(chain)))
    }
}
