//! Shared utilities for integration and load testing.
#![allow(dead_code)]

use async_trait::async_trait;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use cswap_backend::blockchain::{
    BridgeReceipt, Chain, ChainError, ChainResult, ExecutionStrategy, PoolCreation, PoolInfo,
    PriceQuote, SimulatedExecution, SwapParams, SwapResult,
};
use cswap_backend::config::ServiceConfig;
use cswap_backend::{AppState, HttpServer, Shutdown};

/// A running backend on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> cswap_sdk::DexClient {
        cswap_sdk::DexClient::new(&self.url())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Defaults with rate limiting off and short deadlines.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.rate_limit.enabled = false;
    config.timeouts.web3_call_ms = 500;
    config.timeouts.cross_chain_ms = 500;
    config.timeouts.graceful_shutdown_ms = 1_000;
    config
}

pub async fn spawn_server(config: ServiceConfig) -> TestServer {
    let execution = Arc::new(SimulatedExecution::new(&config.simulation));
    spawn_with_execution(config, execution).await
}

pub async fn spawn_with_execution(
    config: ServiceConfig,
    execution: Arc<dyn ExecutionStrategy>,
) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = AppState::with_execution(config, execution).unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(state.clone());
    let rx = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    TestServer {
        addr,
        state,
        shutdown,
    }
}

pub const MODE_OK: u8 = 0;
pub const MODE_FAIL: u8 = 1;
pub const MODE_SLOW: u8 = 2;

/// Execution strategy whose behaviour can be switched at runtime.
///
/// `MODE_OK` delegates to the simulation, `MODE_FAIL` returns an execution
/// error, `MODE_SLOW` sleeps for `delay` before delegating.
pub struct ScriptedExecution {
    mode: AtomicU8,
    delay: Duration,
    calls: AtomicU32,
    inner: SimulatedExecution,
}

impl ScriptedExecution {
    pub fn new(mode: u8, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            mode: AtomicU8::new(mode),
            delay,
            calls: AtomicU32::new(0),
            inner: SimulatedExecution::default(),
        })
    }

    pub fn set_mode(&self, mode: u8) {
        self.mode.store(mode, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    async fn enter(&self) -> ChainResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode.load(Ordering::SeqCst) {
            MODE_FAIL => Err(ChainError::Execution("injected failure".into())),
            MODE_SLOW => {
                tokio::time::sleep(self.delay).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ExecutionStrategy for ScriptedExecution {
    async fn swap(&self, chain: Chain, params: &SwapParams) -> ChainResult<SwapResult> {
        self.enter().await?;
        self.inner.swap(chain, params).await
    }

    async fn create_pool(
        &self,
        chain: Chain,
        token_a: &str,
        token_b: &str,
        fee: &str,
    ) -> ChainResult<PoolCreation> {
        self.enter().await?;
        self.inner.create_pool(chain, token_a, token_b, fee).await
    }

    async fn pool_info(&self, chain: Chain, pool_address: &str) -> ChainResult<PoolInfo> {
        self.enter().await?;
        self.inner.pool_info(chain, pool_address).await
    }

    async fn price(&self, token: &str) -> ChainResult<PriceQuote> {
        self.enter().await?;
        self.inner.price(token).await
    }

    async fn bridge(
        &self,
        from: Chain,
        to: Chain,
        amount: &str,
        token: &str,
    ) -> ChainResult<BridgeReceipt> {
        self.enter().await?;
        self.inner.bridge(from, to, amount, token).await
    }
}

pub fn swap_request(chain: &str, amount_in: &str) -> cswap_sdk::SwapRequest {
    cswap_sdk::SwapRequest {
        token_in: "AVAX".into(),
        token_out: "USDC".into(),
        amount_in: amount_in.into(),
        chain: chain.into(),
        recipient: None,
    }
}
