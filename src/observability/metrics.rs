//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cswap_requests_total` (counter): requests by method, route, status
//! - `cswap_request_duration_seconds` (histogram): latency distribution
//! - `cswap_guarded_calls_total` (counter): guarded calls by dependency, outcome
//! - `cswap_circuit_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `cswap_rate_limited_total` (counter): rejected requests
//!
//! Without an installed recorder every call is a no-op, so unit tests and
//! the CLI pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let status = status.to_string();
    metrics::counter!(
        "cswap_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "cswap_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a breaker-guarded call.
pub fn record_guarded_call(dependency: &str, outcome: &'static str) {
    metrics::counter!(
        "cswap_guarded_calls_total",
        "dependency" => dependency.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Publish a breaker state (0=closed, 1=half-open, 2=open).
pub fn record_circuit_state(breaker: &str, state: u8) {
    metrics::gauge!("cswap_circuit_state", "breaker" => breaker.to_string()).set(state as f64);
}

/// Record a request rejected by the rate limiter.
pub fn record_rate_limited(reason: &'static str) {
    metrics::counter!("cswap_rate_limited_total", "reason" => reason).increment(1);
}

/// Middleware recording per-request count and latency.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
