//! `POST /api/swap`.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::blockchain::simulation::parse_amount;
use crate::blockchain::{SwapParams, SwapResult};
use crate::catalog::TransactionRecord;
use crate::error::ServiceError;
use crate::http::request::{non_empty, opt_string_or_number};
use crate::http::server::AppState;
use crate::resilience::guarded;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    #[serde(default)]
    pub token_in: Option<String>,
    #[serde(default)]
    pub token_out: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub amount_in: Option<String>,
    #[serde(default)]
    pub chain: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SwapResponse {
    #[serde(flatten)]
    pub result: SwapResult,
    /// Chain selector as sent by the client.
    pub chain: String,
}

pub async fn execute_swap(
    State(state): State<AppState>,
    payload: Result<Json<SwapRequest>, JsonRejection>,
) -> Result<Json<SwapResponse>, ServiceError> {
    let Json(request) = payload?;

    let (Some(token_in), Some(token_out), Some(amount_in), Some(chain_raw)) = (
        non_empty(request.token_in),
        non_empty(request.token_out),
        non_empty(request.amount_in),
        non_empty(request.chain),
    ) else {
        return Err(ServiceError::validation(
            "tokenIn, tokenOut, amountIn, chain required",
        ));
    };

    let (chain, entry) = state.chains.resolve(&chain_raw)?;
    parse_amount(&amount_in)?;

    let recipient =
        non_empty(request.recipient).unwrap_or_else(|| chain.default_recipient().to_string());

    tracing::info!(
        chain = %chain,
        token_in = %token_in,
        token_out = %token_out,
        amount_in = %amount_in,
        "Executing swap"
    );

    let params = SwapParams {
        token_in,
        token_out,
        amount_in,
        recipient,
    };
    let adapter = entry.adapter.clone();
    let call_params = params.clone();
    let result = guarded(&entry.breaker, state.config.timeouts.web3_budget(), move || async move {
        adapter
            .execute_swap(&call_params)
            .await
            .map_err(ServiceError::from)
    })
    .await?;

    state.catalog.ledger.record(TransactionRecord::swap(
        chain,
        &params.token_in,
        &params.token_out,
        &params.amount_in,
        &result.amount_out,
        &result.tx_hash,
        &params.recipient,
    ));

    tracing::info!(chain = %chain, tx_hash = %result.tx_hash, amount_out = %result.amount_out, "Swap executed");

    Ok(Json(SwapResponse {
        result,
        chain: chain_raw,
    }))
}
