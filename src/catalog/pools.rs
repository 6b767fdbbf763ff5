//! Pool registry.

use dashmap::{mapref::entry::Entry as MapEntry, DashMap};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::blockchain::Chain;

/// One listed pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSummary {
    pub id: String,
    pub chain: Chain,
    pub tvl: String,
    pub fee: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
}

/// Chain filter parsed from an optional `?chain=` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFilter {
    All,
    Only(Chain),
    /// A selector that names no supported chain. Matches nothing.
    Unknown,
}

impl ChainFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => ChainFilter::All,
            Some(value) => Chain::parse(value).map_or(ChainFilter::Unknown, ChainFilter::Only),
        }
    }

    pub fn matches(self, chain: Chain) -> bool {
        match self {
            ChainFilter::All => true,
            ChainFilter::Only(c) => c == chain,
            ChainFilter::Unknown => false,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    pool: PoolSummary,
}

/// Concurrent pool map keyed by `(chain, id)`, listed in insertion order.
#[derive(Debug, Default)]
pub struct PoolRegistry {
    inner: DashMap<(Chain, String), Entry>,
    next_seq: AtomicU64,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the launch pools on both chains.
    pub fn seeded() -> Self {
        let registry = Self::new();
        for (id, chain, tvl, volume) in [
            ("AVAX-USDC", Chain::Avalanche, "1500000", "500000"),
            ("AVAX-SEI", Chain::Avalanche, "800000", "200000"),
            ("SEI-USDC", Chain::Sei, "3000000", "1000000"),
            ("SEI-AVAX", Chain::Sei, "1200000", "400000"),
        ] {
            registry.upsert(PoolSummary {
                id: id.to_string(),
                chain,
                tvl: tvl.to_string(),
                fee: "0.3%".to_string(),
                volume_24h: volume.to_string(),
            });
        }
        registry
    }

    /// Insert or replace a pool. A replaced pool keeps its list position.
    pub fn upsert(&self, pool: PoolSummary) {
        let key = (pool.chain, pool.id.clone());
        match self.inner.entry(key) {
            MapEntry::Occupied(mut slot) => slot.get_mut().pool = pool,
            MapEntry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Entry { seq, pool });
            }
        }
    }

    pub fn get(&self, chain: Chain, id: &str) -> Option<PoolSummary> {
        self.inner
            .get(&(chain, id.to_string()))
            .map(|entry| entry.pool.clone())
    }

    pub fn list(&self, filter: ChainFilter) -> Vec<PoolSummary> {
        let mut entries: Vec<Entry> = self
            .inner
            .iter()
            .filter(|entry| filter.matches(entry.pool.chain))
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.pool).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
