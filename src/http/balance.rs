//! `GET /api/balance/{address}?chain=`.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::error::ServiceError;
use crate::http::pools::ChainQuery;
use crate::http::request::non_empty;
use crate::http::server::AppState;
use crate::resilience::guarded;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub address: String,
    pub chain: String,
    pub balance: String,
}

pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<BalanceResponse>, ServiceError> {
    let Query(query) = query?;
    let chain_raw = non_empty(query.chain)
        .ok_or_else(|| ServiceError::validation("chain query parameter required"))?;
    let (_, entry) = state.chains.resolve(&chain_raw)?;

    // Malformed addresses are the caller's fault and must not count against the breaker.
    entry.adapter.validate_address(&address)?;

    let adapter = entry.adapter.clone();
    let target = address.clone();
    let balance = guarded(&entry.breaker, state.config.timeouts.web3_budget(), move || async move {
        adapter.get_balance(&target).await.map_err(ServiceError::from)
    })
    .await?;

    Ok(Json(BalanceResponse {
        address,
        chain: chain_raw,
        balance,
    }))
}
