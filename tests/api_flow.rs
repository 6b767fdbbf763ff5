//! End-to-end API tests against a running server.

use reqwest::StatusCode;
use serde_json::{json, Value};

use cswap_sdk::CreatePoolRequest;

mod common;

use common::{spawn_server, swap_request, test_config};

#[tokio::test]
async fn test_swap_on_both_chains() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let avax = client.swap(&swap_request("avax", "10")).await.unwrap();
    assert_eq!(avax.amount_out, "9.9");
    assert_eq!(avax.chain, "avax");
    assert!(avax.tx_hash.starts_with("0x"));
    assert_eq!(avax.tx_hash.len(), 66);

    let sei = client.swap(&swap_request("sei", "10")).await.unwrap();
    assert_eq!(sei.chain, "sei");
    assert_eq!(sei.tx_hash.len(), 64);
    assert!(!sei.tx_hash.starts_with("0x"));
}

#[tokio::test]
async fn test_swap_validation() {
    let server = spawn_server(test_config()).await;
    let http = reqwest::Client::new();
    let url = format!("{}/api/swap", server.url());

    let res = http
        .post(&url)
        .json(&json!({ "tokenIn": "AVAX", "tokenOut": "USDC", "chain": "sei" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "tokenIn, tokenOut, amountIn, chain required");

    let err = server
        .client()
        .swap(&swap_request("solana", "10"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.to_string(), "Backend returned 400 Bad Request: Unsupported chain: solana");

    let err = server
        .client()
        .swap(&swap_request("avalanche", "-3"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    // Numeric amounts are accepted.
    let res = http
        .post(&url)
        .json(&json!({ "tokenIn": "SEI", "tokenOut": "USDC", "amountIn": 200, "chain": "sei" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["amountOut"], "198");

    let res = http
        .post(&url)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pool_lifecycle() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let all = client.list_pools(None).await.unwrap();
    assert_eq!(all.total, 4);
    assert_eq!(all.pools[0].id, "AVAX-USDC");

    let created = client
        .create_pool(&CreatePoolRequest {
            token_a: "WETH".into(),
            token_b: "USDC".into(),
            fee: None,
            chain: "avalanche".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, "WETH-USDC");
    assert_eq!(created.fee, "0.3%");
    assert_eq!(created.pool_address.len(), 42);

    let avalanche = client.list_pools(Some("avalanche")).await.unwrap();
    assert_eq!(avalanche.total, 3);
    assert!(avalanche.pools.iter().any(|p| p.id == "WETH-USDC"));

    let sei = client.list_pools(Some("sei")).await.unwrap();
    assert_eq!(sei.total, 2);

    let unknown = client.list_pools(Some("solana")).await.unwrap();
    assert_eq!(unknown.total, 0);
}

#[tokio::test]
async fn test_create_pool_validation() {
    let server = spawn_server(test_config()).await;
    let res = reqwest::Client::new()
        .post(format!("{}/api/pools", server.url()))
        .json(&json!({ "tokenA": "WETH", "chain": "sei" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "tokenA, tokenB, and chain required");
}

#[tokio::test]
async fn test_pool_detail_infers_chain() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let sei = client.pool("SEI-USDC", None).await.unwrap();
    assert_eq!(sei.chain, "sei");
    assert_eq!(sei.token0, "SEI");
    assert_eq!(sei.tvl, "3000000");

    let avax = client.pool("AVAX-USDC", None).await.unwrap();
    assert_eq!(avax.chain, "avalanche");
    assert_eq!(avax.reserve0, "1000000");

    let explicit = client.pool("SEI-USDC", Some("avax")).await.unwrap();
    assert_eq!(explicit.chain, "avax");
    assert_eq!(explicit.token0, "AVAX");

    let err = client.pool("X-Y", Some("cosmos")).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_transactions_recorded_newest_first() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    for amount in ["1", "2", "3"] {
        client.swap(&swap_request("sei", amount)).await.unwrap();
    }
    client.swap(&swap_request("avalanche", "4")).await.unwrap();

    let all = client.transactions(None, None).await.unwrap();
    assert_eq!(all.total, 4);
    let amounts: Vec<_> = all.transactions.iter().map(|t| t.amount_in.as_str()).collect();
    assert_eq!(amounts, vec!["4", "3", "2", "1"]);
    assert_eq!(all.transactions[0].kind, "swap");

    let sei = client.transactions(Some(2), Some("sei")).await.unwrap();
    assert_eq!(sei.total, 2);
    assert!(sei.transactions.iter().all(|t| t.chain == "sei"));

    let res = reqwest::get(format!("{}/api/admin/transactions?limit=abc", server.url()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_stats_and_health() {
    let server = spawn_server(test_config()).await;
    let client = server.client();
    client.swap(&swap_request("sei", "1")).await.unwrap();

    let stats = client.stats().await.unwrap();
    assert_eq!(stats["totalPools"], 4);
    assert_eq!(stats["totalTVL"], "6500000");
    assert_eq!(stats["activeUsers"], 1);
    assert_eq!(stats["chains"]["avalanche"]["pools"], 2);
    assert!(stats["timestamp"].is_string());

    let health = client.admin_health().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["backend"]["status"], "up");
    assert_eq!(health["services"]["sei"]["status"], "connected");
    assert_eq!(health["circuitBreakers"]["priceFeed"]["state"], "CLOSED");
    assert_eq!(health["circuitBreakers"]["bridge"]["failures"], 0);
}

#[tokio::test]
async fn test_admin_requires_key_when_configured() {
    let mut config = test_config();
    config.admin.api_key = Some("s3cret".into());
    let server = spawn_server(config).await;

    let err = server.client().stats().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let err = server.client().with_api_key("wrong").stats().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let stats = server.client().with_api_key("s3cret").stats().await.unwrap();
    assert_eq!(stats["totalPools"], 4);

    // Public routes stay open.
    assert!(server.client().list_pools(None).await.is_ok());
}

#[tokio::test]
async fn test_balance_validation() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let err = client.balance("0x123", "avalanche").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.to_string(), "Backend returned 400 Bad Request: Invalid avalanche address: 0x123");

    let err = client.balance("sei1test", "sei").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    let err = client.balance("0x0000000000000000000000000000000000000000", "eth").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    let res = reqwest::get(format!(
        "{}/api/balance/0x0000000000000000000000000000000000000000",
        server.url()
    ))
    .await
    .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Rejected input never reaches the breaker.
    let health = client.admin_health().await.unwrap();
    assert_eq!(health["circuitBreakers"]["avalanche"]["failures"], 0);
}

#[tokio::test]
async fn test_price_and_bridge() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let price = client.price("AVAX").await.unwrap();
    assert_eq!(price["token"], "AVAX");
    assert_eq!(price["price"]["price"], 100.0);
    assert_eq!(price["price"]["currency"], "USD");

    let bridge = client.bridge("avalanche", "sei", "5", "USDC").await.unwrap();
    assert_eq!(bridge["success"], true);
    assert_eq!(bridge["status"], "pending");
    assert!(bridge["transactionHash"].as_str().unwrap().starts_with("0x"));

    let err = client.bridge("avalanche", "avalanche", "5", "USDC").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));

    let err = client.bridge("avalanche", "near", "5", "USDC").await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_health_endpoints() {
    let server = spawn_server(test_config()).await;
    let client = server.client();

    let health = client.health().await.unwrap();
    assert_eq!(health["status"], "healthy");
    assert!(health["uptime"].as_f64().is_some());
    let names: Vec<_> = health["circuitBreakers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["avalanche", "sei", "price-feed", "bridge"]);

    let db: Value = reqwest::get(format!("{}/health/db", server.url()))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(db["status"], "healthy");
    assert_eq!(db["database"]["pools"], 4);
}

#[tokio::test]
async fn test_rate_limit() {
    let mut config = test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.max_requests = 3;
    config.rate_limit.window_secs = 3600;
    let server = spawn_server(config).await;

    let http = reqwest::Client::new();
    for _ in 0..3 {
        let res = http.get(format!("{}/health", server.url())).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let res = http.get(format!("{}/health", server.url())).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = spawn_server(test_config()).await;
    let res = reqwest::get(format!("{}/api/pools", server.url())).await.unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(id.len(), 36);
}
