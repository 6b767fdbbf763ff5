//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the application state (composition root for adapters and breakers)
//! - Create the Axum router with all handlers
//! - Wire up middleware (request id, tracing, timeout, limits, CORS, security headers, metrics)
//! - Serve with a bounded graceful shutdown

use axum::{
    error_handling::HandleErrorLayer,
    middleware,
    routing::{get, post},
    BoxError, Router,
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::admin;
use crate::blockchain::{ChainRegistry, ExecutionStrategy, SimulatedExecution};
use crate::catalog::Catalog;
use crate::config::ServiceConfig;
use crate::http::{balance, error, health, market, pools, request, swap};
use crate::observability::metrics;
use crate::resilience::CircuitBreaker;
use crate::security::{self, rate_limit::RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppInner>,
}

pub struct AppInner {
    pub config: ServiceConfig,
    pub chains: ChainRegistry,
    /// Strategy behind the price feed and the bridge.
    pub execution: Arc<dyn ExecutionStrategy>,
    pub price_breaker: CircuitBreaker,
    pub bridge_breaker: CircuitBreaker,
    pub catalog: Catalog,
    pub rate_limiter: Arc<RateLimiter>,
    pub started_at: Instant,
}

impl Deref for AppState {
    type Target = AppInner;

    fn deref(&self) -> &AppInner {
        &self.inner
    }
}

impl AppState {
    /// State backed by the simulated execution strategy.
    pub fn from_config(config: ServiceConfig) -> std::io::Result<Self> {
        let execution = Arc::new(SimulatedExecution::new(&config.simulation));
        Self::with_execution(config, execution)
    }

    pub fn with_execution(
        config: ServiceConfig,
        execution: Arc<dyn ExecutionStrategy>,
    ) -> std::io::Result<Self> {
        let chains = ChainRegistry::new(&config.chains, &config.circuit_breaker, execution.clone());
        let catalog = Catalog::open(&config.storage)?;
        Ok(Self::from_parts(config, chains, execution, catalog))
    }

    pub fn from_parts(
        config: ServiceConfig,
        chains: ChainRegistry,
        execution: Arc<dyn ExecutionStrategy>,
        catalog: Catalog,
    ) -> Self {
        let inner = AppInner {
            price_breaker: CircuitBreaker::new("price-feed", &config.circuit_breaker),
            bridge_breaker: CircuitBreaker::new("bridge", &config.circuit_breaker),
            rate_limiter: Arc::new(RateLimiter::new(&config.rate_limit)),
            started_at: Instant::now(),
            config,
            chains,
            execution,
            catalog,
        };
        Self { inner: Arc::new(inner) }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;
    let request_deadline = config.timeouts.api_request();

    let routes = Router::new()
        .route("/api/swap", post(swap::execute_swap))
        .route("/api/pools", get(pools::list_pools).post(pools::create_pool))
        .route("/api/pools/{id}", get(pools::pool_detail))
        .route("/api/balance/{address}", get(balance::get_balance))
        .route("/api/price/{token}", get(market::get_price))
        .route("/api/bridge", post(market::bridge))
        .nest("/api/admin", admin::router(state.clone()))
        .route("/health", get(health::liveness))
        .route("/health/db", get(health::readiness))
        .route_layer(middleware::from_fn(metrics::track_metrics))
        .fallback(error::not_found)
        .with_state(state.clone());

    security::headers::apply(routes)
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            security::rate_limit::rate_limit_middleware,
        ))
        .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                    error::handle_layer_error(err, request_deadline)
                }))
                .timeout(request_deadline),
        )
        .layer(security::headers::cors_layer(&config.cors))
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(request::make_request_span::<axum::body::Body>))
        .layer(request::propagate_request_id_layer())
        .layer(request::set_request_id_layer())
}

/// HTTP server for the DEX backend.
pub struct HttpServer {
    router: Router,
    grace_period: Duration,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        let grace_period = state.config.timeouts.graceful_shutdown();
        Self {
            router: build_router(state),
            grace_period,
        }
    }

    /// Serve until `shutdown` fires, then drain in-flight requests for at
    /// most the graceful-shutdown period.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let draining = Arc::new(Notify::new());
        let signal = {
            let draining = draining.clone();
            async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
                draining.notify_one();
            }
        };

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();
        let grace_period = self.grace_period;

        tokio::select! {
            result = serve => result?,
            _ = async {
                draining.notified().await;
                tokio::time::sleep(grace_period).await;
            } => {
                tracing::warn!(
                    grace_ms = grace_period.as_millis() as u64,
                    "Graceful shutdown period elapsed, dropping open connections"
                );
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
