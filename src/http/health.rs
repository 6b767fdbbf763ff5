//! Liveness and readiness probes.
//!
//! Both checks are bounded by the admin query budget; a check that overruns
//! reports 503 `unhealthy` instead of hanging the probe.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ServiceError;
use crate::http::server::AppState;
use crate::resilience::{with_timeout, BreakerSnapshot};

/// Snapshots of every breaker, chain breakers first.
pub fn breaker_snapshots(state: &AppState) -> Vec<BreakerSnapshot> {
    state
        .chains
        .entries()
        .map(|(_, entry)| entry.breaker.snapshot())
        .chain([state.price_breaker.snapshot(), state.bridge_breaker.snapshot()])
        .collect()
}

fn unhealthy(err: ServiceError) -> Response {
    tracing::error!(error = %err, "Health check failed");
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "unhealthy",
            "error": err.to_string(),
            "timestamp": Utc::now(),
        })),
    )
        .into_response()
}

pub async fn liveness(State(state): State<AppState>) -> Response {
    let check = async {
        Ok::<Value, ServiceError>(json!({
            "uptime": state.uptime().as_secs_f64(),
            "version": env!("CARGO_PKG_VERSION"),
            "circuitBreakers": breaker_snapshots(&state),
        }))
    };

    match with_timeout(check, state.config.timeouts.admin_query()).await {
        Ok(mut body) => {
            body["status"] = json!("healthy");
            body["timestamp"] = json!(Utc::now());
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => unhealthy(e),
    }
}

pub async fn readiness(State(state): State<AppState>) -> Response {
    let check = async {
        Ok::<Value, ServiceError>(json!({
            "status": "connected",
            "pools": state.catalog.pools.len(),
            "transactions": state.catalog.ledger.len(),
            "persistent": state.config.storage.snapshot_path.is_some(),
        }))
    };

    match with_timeout(check, state.config.timeouts.admin_query()).await {
        Ok(database) => Json(json!({
            "status": "healthy",
            "database": database,
            "timestamp": Utc::now(),
        }))
        .into_response(),
        Err(e) => unhealthy(e),
    }
}
