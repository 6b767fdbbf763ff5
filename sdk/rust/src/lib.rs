//! Typed client for the cswap DEX backend.

pub mod client;

pub use client::{
    BalanceResponse, CreatePoolRequest, CreatedPool, DexClient, PoolDetail, PoolList, PoolSummary,
    SdkError, SwapRequest, SwapResponse, TransactionList, TransactionRecord,
};
