//! Per-client rate limiting.
//!
//! A token bucket per client IP: `max_requests` tokens, refilled evenly over
//! `window_secs`. Requests without connection info share the "unknown" bucket.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

const PRUNE_THRESHOLD: usize = 10_000;

/// A simple token bucket.
struct TokenBucket {
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(capacity: f64) -> Self {
        Self {
            tokens: capacity,
            last_update: Instant::now(),
        }
    }

    fn try_acquire(&mut self, capacity: f64, refill_rate: f64) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = (self.tokens + elapsed * refill_rate).min(capacity);
        self.last_update = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

pub struct RateLimiter {
    enabled: bool,
    capacity: f64,
    refill_per_sec: f64,
    window: Duration,
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        let window = Duration::from_secs(config.window_secs.max(1));
        let capacity = config.max_requests.max(1) as f64;
        Self {
            enabled: config.enabled,
            capacity,
            refill_per_sec: capacity / window.as_secs_f64(),
            window,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Take one token for `client`. Always succeeds when disabled.
    pub fn check(&self, client: &str) -> bool {
        if !self.enabled {
            return true;
        }

        let mut buckets = self.lock();
        if buckets.len() >= PRUNE_THRESHOLD {
            // A bucket idle for a full window has refilled and can be dropped.
            let window = self.window;
            buckets.retain(|_, b| b.last_update.elapsed() < window);
        }

        buckets
            .entry(client.to_string())
            .or_insert_with(|| TokenBucket::new(self.capacity))
            .try_acquire(self.capacity, self.refill_per_sec)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, TokenBucket>> {
        self.buckets.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Middleware rejecting clients that exhausted their budget with 429.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if limiter.check(&client) {
        next.run(request).await
    } else {
        tracing::warn!(client = %client, "Rate limit exceeded");
        metrics::record_rate_limited("ip_budget");
        (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Rate limit exceeded" })),
        )
            .into_response()
    }
}
