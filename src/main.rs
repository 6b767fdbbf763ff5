//! cswap DEX backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ middleware (request id, trace, timeout, rate limit, CORS)
//!                         │
//!                         ▼
//!                     handlers ── validate ── resolve chain
//!                         │
//!                         ▼
//!              guarded(breaker, budget, op)
//!                         │
//!            ┌────────────┴────────────┐
//!            ▼                         ▼
//!     AvalancheAdapter            SeiAdapter
//!     (alloy JSON-RPC)        (Cosmos REST, reqwest)
//!            └──── ExecutionStrategy ──┘
//!                  (simulated swaps / pools)
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use cswap_backend::config::loader;
use cswap_backend::lifecycle::{self, signals, Shutdown};
use cswap_backend::observability::{logging, metrics};
use cswap_backend::{AppState, HttpServer};

#[derive(Parser)]
#[command(name = "cswap-backend", version, about = "DEX backend for Avalanche and SEI")]
struct Args {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, env = "CSWAP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match loader::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cswap-backend starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_request_ms = config.timeouts.api_request_ms,
        web3_call_ms = config.timeouts.web3_call_ms,
        breaker_threshold = config.circuit_breaker.failure_threshold,
        breaker_recovery_ms = config.circuit_breaker.recovery_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let state = AppState::from_config(config)?;
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    HttpServer::new(state.clone())
        .run(listener, shutdown.subscribe())
        .await?;

    lifecycle::cleanup(&state).await?;
    tracing::info!("Shutdown complete");
    Ok(())
}
