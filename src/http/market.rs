//! Price feed and cross-chain bridge endpoints.
//!
//! Both go through the shared execution strategy, each behind its own
//! breaker (`price-feed`, `bridge`) rather than a chain breaker.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blockchain::simulation::parse_amount;
use crate::blockchain::{Chain, PriceQuote};
use crate::error::ServiceError;
use crate::http::request::{non_empty, opt_string_or_number};
use crate::http::server::AppState;
use crate::resilience::guarded;

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub token: String,
    pub price: PriceQuote,
    pub timestamp: DateTime<Utc>,
}

pub async fn get_price(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<PriceResponse>, ServiceError> {
    let execution = state.execution.clone();
    let symbol = token.clone();
    let price = guarded(&state.price_breaker, state.config.timeouts.web3_budget(), move || async move {
        execution.price(&symbol).await.map_err(ServiceError::from)
    })
    .await?;

    Ok(Json(PriceResponse {
        token,
        price,
        timestamp: Utc::now(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRequest {
    #[serde(default)]
    pub from_chain: Option<String>,
    #[serde(default)]
    pub to_chain: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub amount: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn bridge(
    State(state): State<AppState>,
    payload: Result<Json<BridgeRequest>, JsonRejection>,
) -> Result<Json<BridgeResponse>, ServiceError> {
    let Json(request) = payload?;

    let (Some(from_raw), Some(to_raw), Some(amount), Some(token)) = (
        non_empty(request.from_chain),
        non_empty(request.to_chain),
        non_empty(request.amount),
        non_empty(request.token),
    ) else {
        return Err(ServiceError::validation(
            "fromChain, toChain, amount, token required",
        ));
    };

    let from = Chain::parse(&from_raw).ok_or(ServiceError::UnsupportedChain(from_raw))?;
    let to = Chain::parse(&to_raw).ok_or(ServiceError::UnsupportedChain(to_raw))?;
    if from == to {
        return Err(ServiceError::validation("fromChain and toChain must differ"));
    }
    parse_amount(&amount)?;

    tracing::info!(from = %from, to = %to, amount = %amount, token = %token, "Bridging");

    let execution = state.execution.clone();
    let receipt = guarded(&state.bridge_breaker, state.config.timeouts.bridge_budget(), move || async move {
        execution
            .bridge(from, to, &amount, &token)
            .await
            .map_err(ServiceError::from)
    })
    .await?;

    Ok(Json(BridgeResponse {
        success: true,
        transaction_hash: receipt.tx_hash,
        status: receipt.status,
        timestamp: Utc::now(),
    }))
}
