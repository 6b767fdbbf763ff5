//! Read-only admin API under `/api/admin`.

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::AppState;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/health", get(get_health))
        .route("/transactions", get(get_transactions))
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
}
