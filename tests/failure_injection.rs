//! Failure injection tests: breakers and deadlines around chain calls.

use reqwest::StatusCode;
use std::time::Duration;

mod common;

use common::{
    spawn_server, spawn_with_execution, swap_request, test_config, ScriptedExecution, MODE_FAIL,
    MODE_OK, MODE_SLOW,
};

#[tokio::test]
async fn test_breaker_opens_after_threshold() {
    let execution = ScriptedExecution::new(MODE_FAIL, Duration::ZERO);
    let server = spawn_with_execution(test_config(), execution.clone()).await;
    let client = server.client();

    for _ in 0..3 {
        let err = client.swap(&swap_request("avalanche", "10")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
    assert_eq!(execution.calls(), 3);

    let err = client.swap(&swap_request("avalanche", "10")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(
        err.to_string(),
        "Backend returned 503 Service Unavailable: Circuit breaker avalanche is OPEN"
    );
    assert_eq!(execution.calls(), 3, "open breaker must not invoke the adapter");

    let health = client.admin_health().await.unwrap();
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["services"]["avalanche"]["status"], "unavailable");
    assert_eq!(health["circuitBreakers"]["avalanche"]["state"], "OPEN");
    assert_eq!(health["circuitBreakers"]["avalanche"]["failures"], 3);
}

#[tokio::test]
async fn test_chain_breakers_are_independent() {
    let execution = ScriptedExecution::new(MODE_FAIL, Duration::ZERO);
    let server = spawn_with_execution(test_config(), execution.clone()).await;
    let client = server.client();

    for _ in 0..3 {
        let _ = client.swap(&swap_request("avalanche", "10")).await;
    }
    execution.set_mode(MODE_OK);

    let sei = client.swap(&swap_request("sei", "10")).await.unwrap();
    assert_eq!(sei.amount_out, "9.9");

    let err = client.swap(&swap_request("avax", "10")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
}

#[tokio::test]
async fn test_slow_adapter_times_out_and_trips_breaker() {
    let execution = ScriptedExecution::new(MODE_SLOW, Duration::from_secs(5));
    let mut config = test_config();
    config.timeouts.web3_call_ms = 100;
    config.circuit_breaker.failure_threshold = 2;
    let server = spawn_with_execution(config, execution.clone()).await;
    let client = server.client();

    for _ in 0..2 {
        let err = client.swap(&swap_request("sei", "10")).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::REQUEST_TIMEOUT));
        assert_eq!(
            err.to_string(),
            "Backend returned 408 Request Timeout: Operation timed out after 100ms"
        );
    }

    let err = client.swap(&swap_request("sei", "10")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(execution.calls(), 2);

    // Timed-out swaps are not recorded.
    let txs = client.transactions(None, None).await.unwrap();
    assert_eq!(txs.total, 0);
}

#[tokio::test]
async fn test_breaker_recovers_after_cooldown() {
    let execution = ScriptedExecution::new(MODE_FAIL, Duration::ZERO);
    let mut config = test_config();
    config.circuit_breaker.failure_threshold = 1;
    config.circuit_breaker.recovery_ms = 200;
    let server = spawn_with_execution(config, execution.clone()).await;
    let client = server.client();

    let err = client.price("AVAX").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    let err = client.price("AVAX").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));

    execution.set_mode(MODE_OK);
    tokio::time::sleep(Duration::from_millis(300)).await;

    let price = client.price("AVAX").await.unwrap();
    assert_eq!(price["price"]["currency"], "USD");

    let health = client.admin_health().await.unwrap();
    assert_eq!(health["circuitBreakers"]["priceFeed"]["state"], "CLOSED");
    assert_eq!(health["circuitBreakers"]["priceFeed"]["failures"], 0);
}

#[tokio::test]
async fn test_half_open_probe_failure_reopens() {
    let execution = ScriptedExecution::new(MODE_FAIL, Duration::ZERO);
    let mut config = test_config();
    config.circuit_breaker.failure_threshold = 1;
    config.circuit_breaker.recovery_ms = 200;
    let server = spawn_with_execution(config, execution.clone()).await;
    let client = server.client();

    let _ = client.bridge("avalanche", "sei", "1", "USDC").await;
    tokio::time::sleep(Duration::from_millis(300)).await;

    let err = client.bridge("avalanche", "sei", "1", "USDC").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(execution.calls(), 2);

    let err = client.bridge("avalanche", "sei", "1", "USDC").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(execution.calls(), 2);
}

#[tokio::test]
async fn test_bridge_uses_cross_chain_budget() {
    let execution = ScriptedExecution::new(MODE_SLOW, Duration::from_millis(300));
    let mut config = test_config();
    config.timeouts.web3_call_ms = 100;
    config.timeouts.cross_chain_ms = 2_000;
    let server = spawn_with_execution(config, execution).await;
    let client = server.client();

    // 300ms is over the Web3 budget but within the cross-chain one.
    let err = client.price("SEI").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::REQUEST_TIMEOUT));

    let bridge = client.bridge("sei", "avalanche", "2", "SEI").await.unwrap();
    assert_eq!(bridge["success"], true);
}

#[tokio::test]
async fn test_unreachable_rpc_is_bad_gateway() {
    let mut config = test_config();
    config.chains.avalanche.rpc_url = "http://127.0.0.1:1".to_string();
    config.chains.sei.rest_url = "http://127.0.0.1:1".to_string();
    let server = spawn_server(config).await;
    let client = server.client();

    let err = client
        .balance("0x0000000000000000000000000000000000000000", "avalanche")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));

    let err = client
        .balance("sei1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du", "sei")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));

    let health = client.admin_health().await.unwrap();
    assert_eq!(health["circuitBreakers"]["avalanche"]["failures"], 1);
    assert_eq!(health["circuitBreakers"]["sei"]["failures"], 1);
}

#[tokio::test]
async fn test_request_deadline_returns_408() {
    let execution = ScriptedExecution::new(MODE_SLOW, Duration::from_secs(5));
    let mut config = test_config();
    config.timeouts.api_request_ms = 200;
    config.timeouts.web3_call_ms = 10_000;
    let server = spawn_with_execution(config, execution).await;
    let client = server.client();

    // The chain call gives up just inside the request deadline, so the
    // breaker sees the failure.
    let err = client.swap(&swap_request("sei", "1")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::REQUEST_TIMEOUT));
    assert_eq!(
        err.to_string(),
        "Backend returned 408 Request Timeout: Operation timed out after 180ms"
    );

    let health = client.admin_health().await.unwrap();
    assert_eq!(health["circuitBreakers"]["sei"]["failures"], 1);
}
