use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{CatalogStats, ChainFilter, TransactionRecord};
use crate::error::ServiceError;
use crate::http::server::AppState;
use crate::resilience::{with_timeout, CircuitState};

const DEFAULT_TRANSACTION_LIMIT: usize = 50;

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CatalogStats,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<f64>,
}

#[derive(Serialize)]
pub struct BreakerStatus {
    pub state: CircuitState,
    pub failures: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub services: BTreeMap<&'static str, ServiceStatus>,
    pub circuit_breakers: BTreeMap<&'static str, BreakerStatus>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<String>,
    pub chain: Option<String>,
}

#[derive(Serialize)]
pub struct TransactionList {
    pub transactions: Vec<TransactionRecord>,
    pub total: usize,
}

fn service_status(state: CircuitState) -> &'static str {
    match state {
        CircuitState::Closed => "connected",
        CircuitState::HalfOpen => "recovering",
        CircuitState::Open => "unavailable",
    }
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ServiceError> {
    let stats = with_timeout(
        async { Ok::<_, ServiceError>(state.catalog.stats()) },
        state.config.timeouts.admin_query(),
    )
    .await?;

    Ok(Json(StatsResponse {
        stats,
        timestamp: Utc::now(),
    }))
}

pub async fn get_health(State(state): State<AppState>) -> Result<Json<HealthReport>, ServiceError> {
    let report = async {
        let mut services = BTreeMap::new();
        let mut breakers = BTreeMap::new();
        let mut degraded = false;

        services.insert(
            "backend",
            ServiceStatus {
                status: "up",
                uptime: Some(state.uptime().as_secs_f64()),
            },
        );

        for (chain, entry) in state.chains.entries() {
            let snapshot = entry.breaker.snapshot();
            degraded |= snapshot.state != CircuitState::Closed;
            services.insert(
                chain.as_str(),
                ServiceStatus {
                    status: service_status(snapshot.state),
                    uptime: None,
                },
            );
            breakers.insert(
                chain.as_str(),
                BreakerStatus {
                    state: snapshot.state,
                    failures: snapshot.failures,
                },
            );
        }

        for (key, breaker) in [("priceFeed", &state.price_breaker), ("bridge", &state.bridge_breaker)] {
            let snapshot = breaker.snapshot();
            degraded |= snapshot.state != CircuitState::Closed;
            breakers.insert(
                key,
                BreakerStatus {
                    state: snapshot.state,
                    failures: snapshot.failures,
                },
            );
        }

        Ok::<_, ServiceError>(HealthReport {
            status: if degraded { "degraded" } else { "healthy" },
            services,
            circuit_breakers: breakers,
            timestamp: Utc::now(),
        })
    };

    let report = with_timeout(report, state.config.timeouts.admin_query()).await?;
    Ok(Json(report))
}

pub async fn get_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionQuery>, QueryRejection>,
) -> Result<Json<TransactionList>, ServiceError> {
    let Query(query) = query?;

    let limit = match query.limit.as_deref() {
        None | Some("") => DEFAULT_TRANSACTION_LIMIT,
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| ServiceError::validation("limit must be a non-negative integer"))?,
    };
    let filter = ChainFilter::parse(query.chain.as_deref());

    let transactions = with_timeout(
        async { Ok::<_, ServiceError>(state.catalog.ledger.recent(limit, filter)) },
        state.config.timeouts.admin_query(),
    )
    .await?;

    Ok(Json(TransactionList {
        total: transactions.len(),
        transactions,
    }))
}
