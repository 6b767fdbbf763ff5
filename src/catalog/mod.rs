//! In-memory catalog of pools and recent transactions.
//!
//! # Responsibilities
//! - Back the pool list, admin stats and transaction endpoints
//! - Record every successful swap
//! - Optionally persist to a JSON snapshot (loaded at startup, saved at shutdown)

pub mod ledger;
pub mod pools;

pub use ledger::{TransactionKind, TransactionLedger, TransactionRecord};
pub use pools::{ChainFilter, PoolRegistry, PoolSummary};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::blockchain::Chain;
use crate::config::StorageConfig;

pub struct Catalog {
    pub pools: PoolRegistry,
    pub ledger: TransactionLedger,
    snapshot_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    pools: Vec<PoolSummary>,
    transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainStats {
    pub tvl: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
    pub pools: usize,
}

/// Aggregates for `/api/admin/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    #[serde(rename = "totalTVL")]
    pub total_tvl: String,
    #[serde(rename = "totalVolume24h")]
    pub total_volume_24h: String,
    pub total_pools: usize,
    pub active_users: usize,
    pub chains: BTreeMap<&'static str, ChainStats>,
}

impl Catalog {
    /// Seeded catalog without persistence.
    pub fn in_memory(ledger_capacity: usize) -> Self {
        Self {
            pools: PoolRegistry::seeded(),
            ledger: TransactionLedger::new(ledger_capacity),
            snapshot_path: None,
        }
    }

    /// Open the catalog, restoring the snapshot when one exists.
    pub fn open(config: &StorageConfig) -> std::io::Result<Self> {
        let mut catalog = Self::in_memory(config.ledger_capacity);
        let Some(path) = config.snapshot_path.as_deref().map(PathBuf::from) else {
            return Ok(catalog);
        };

        if path.exists() {
            catalog.restore(&path)?;
        }
        catalog.snapshot_path = Some(path);
        Ok(catalog)
    }

    fn restore(&self, path: &Path) -> std::io::Result<()> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;

        for pool in snapshot.pools {
            self.pools.upsert(pool);
        }
        for tx in snapshot.transactions {
            self.ledger.record(tx);
        }

        tracing::info!(
            path = %path.display(),
            pools = self.pools.len(),
            transactions = self.ledger.len(),
            "Loaded catalog snapshot"
        );
        Ok(())
    }

    /// Write the snapshot if a path is configured. Returns whether anything was written.
    pub fn save(&self) -> std::io::Result<bool> {
        let Some(path) = &self.snapshot_path else {
            return Ok(false);
        };

        let snapshot = Snapshot {
            pools: self.pools.list(ChainFilter::All),
            transactions: self.ledger.all(),
        };
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &snapshot)?;

        tracing::info!(
            path = %path.display(),
            pools = snapshot.pools.len(),
            transactions = snapshot.transactions.len(),
            "Saved catalog snapshot"
        );
        Ok(true)
    }

    pub fn stats(&self) -> CatalogStats {
        let pools = self.pools.list(ChainFilter::All);

        let mut chains = BTreeMap::new();
        for chain in Chain::ALL {
            let on_chain: Vec<_> = pools.iter().filter(|p| p.chain == chain).collect();
            chains.insert(
                chain.as_str(),
                ChainStats {
                    tvl: sum_decimal(on_chain.iter().map(|p| p.tvl.as_str())),
                    volume_24h: sum_decimal(on_chain.iter().map(|p| p.volume_24h.as_str())),
                    pools: on_chain.len(),
                },
            );
        }

        CatalogStats {
            total_tvl: sum_decimal(pools.iter().map(|p| p.tvl.as_str())),
            total_volume_24h: sum_decimal(pools.iter().map(|p| p.volume_24h.as_str())),
            total_pools: pools.len(),
            active_users: self.ledger.distinct_recipients(),
            chains,
        }
    }
}

// Unparseable values count as zero.
fn sum_decimal<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values
        .map(|v| v.parse::<f64>().unwrap_or(0.0))
        .sum::<f64>()
        .to_string()
}
