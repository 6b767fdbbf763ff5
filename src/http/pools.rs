//! Pool endpoints: list, detail, create.
//!
//! Listing treats an unrecognized `?chain=` as a filter that matches nothing,
//! while detail and create reject it with 400. Clients rely on both.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::{Chain, PoolCreation, PoolInfo};
use crate::catalog::{ChainFilter, PoolSummary};
use crate::error::ServiceError;
use crate::http::request::non_empty;
use crate::http::server::AppState;
use crate::resilience::{guarded, with_timeout};

const DEFAULT_FEE: &str = "0.3%";

#[derive(Debug, Default, Deserialize)]
pub struct ChainQuery {
    pub chain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PoolList {
    pub pools: Vec<PoolSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct PoolDetail {
    pub id: String,
    pub chain: String,
    #[serde(flatten)]
    pub info: PoolInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    #[serde(default)]
    pub token_a: Option<String>,
    #[serde(default)]
    pub token_b: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedPool {
    pub id: String,
    pub chain: String,
    #[serde(flatten)]
    pub creation: PoolCreation,
    pub fee: String,
}

pub async fn list_pools(
    State(state): State<AppState>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<PoolList>, ServiceError> {
    let Query(query) = query?;
    let filter = ChainFilter::parse(query.chain.as_deref());

    let pools = with_timeout(
        async { Ok::<_, ServiceError>(state.catalog.pools.list(filter)) },
        state.config.timeouts.admin_query(),
    )
    .await?;

    Ok(Json(PoolList {
        total: pools.len(),
        pools,
    }))
}

/// Chain for a pool id when the client did not name one.
fn infer_chain(id: &str) -> &'static str {
    if id.contains("SEI") {
        Chain::Sei.as_str()
    } else {
        Chain::Avalanche.as_str()
    }
}

pub async fn pool_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ChainQuery>, QueryRejection>,
) -> Result<Json<PoolDetail>, ServiceError> {
    let Query(query) = query?;
    let chain_raw = non_empty(query.chain).unwrap_or_else(|| infer_chain(&id).to_string());
    let (_, entry) = state.chains.resolve(&chain_raw)?;

    let adapter = entry.adapter.clone();
    let pool_id = id.clone();
    let info = guarded(&entry.breaker, state.config.timeouts.web3_budget(), move || async move {
        adapter
            .get_pool_info(&pool_id)
            .await
            .map_err(ServiceError::from)
    })
    .await?;

    Ok(Json(PoolDetail {
        id,
        chain: chain_raw,
        info,
    }))
}

pub async fn create_pool(
    State(state): State<AppState>,
    payload: Result<Json<CreatePoolRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedPool>), ServiceError> {
    let Json(request) = payload?;

    let (Some(token_a), Some(token_b), Some(chain_raw)) = (
        non_empty(request.token_a),
        non_empty(request.token_b),
        non_empty(request.chain),
    ) else {
        return Err(ServiceError::validation("tokenA, tokenB, and chain required"));
    };

    let (chain, entry) = state.chains.resolve(&chain_raw)?;
    let fee = non_empty(request.fee).unwrap_or_else(|| DEFAULT_FEE.to_string());
    tracing::info!(chain = %chain, token_a = %token_a, token_b = %token_b, fee = %fee, "Creating pool");

    let adapter = entry.adapter.clone();
    let (a, b, f) = (token_a.clone(), token_b.clone(), fee.clone());
    let creation = guarded(&entry.breaker, state.config.timeouts.web3_budget(), move || async move {
        adapter
            .create_pool(&a, &b, &f)
            .await
            .map_err(ServiceError::from)
    })
    .await?;

    let id = format!("{}-{}", token_a, token_b);
    state.catalog.pools.upsert(PoolSummary {
        id: id.clone(),
        chain,
        tvl: "0".to_string(),
        fee: fee.clone(),
        volume_24h: "0".to_string(),
    });

    Ok((
        StatusCode::CREATED,
        Json(CreatedPool {
            id,
            chain: chain_raw,
            creation,
            fee,
        }),
    ))
}
