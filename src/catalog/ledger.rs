//! Bounded transaction ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::blockchain::Chain;
use crate::catalog::ChainFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Swap,
}

/// A completed swap as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub chain: Chain,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out: String,
    pub tx_hash: String,
    pub recipient: String,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub fn swap(
        chain: Chain,
        token_in: &str,
        token_out: &str,
        amount_in: &str,
        amount_out: &str,
        tx_hash: &str,
        recipient: &str,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind: TransactionKind::Swap,
            chain,
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in: amount_in.to_string(),
            amount_out: amount_out.to_string(),
            tx_hash: tx_hash.to_string(),
            recipient: recipient.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Ring buffer of the most recent transactions; the oldest entry is evicted
/// once `capacity` is reached.
#[derive(Debug)]
pub struct TransactionLedger {
    capacity: usize,
    entries: Mutex<VecDeque<TransactionRecord>>,
}

impl TransactionLedger {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn record(&self, record: TransactionRecord) {
        let mut entries = self.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(record);
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize, filter: ChainFilter) -> Vec<TransactionRecord> {
        self.lock()
            .iter()
            .rev()
            .filter(|r| filter.matches(r.chain))
            .take(limit)
            .cloned()
            .collect()
    }

    /// Oldest first, for snapshots.
    pub fn all(&self) -> Vec<TransactionRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn distinct_recipients(&self) -> usize {
        self.lock()
            .iter()
            .map(|r| r.recipient.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<TransactionRecord>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
