use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by every client call.
#[derive(Debug, Error)]
pub enum SdkError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("Invalid response body: {0}")]
    Decode(serde_json::Error),
}

impl SdkError {
    /// HTTP status for `Api` errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub chain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub tx_hash: String,
    pub amount_out: String,
    pub chain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePoolRequest {
    pub token_a: String,
    pub token_b: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
    pub chain: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPool {
    pub id: String,
    pub chain: String,
    pub pool_address: String,
    pub tx_hash: String,
    pub fee: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolSummary {
    pub id: String,
    pub chain: String,
    pub tvl: String,
    pub fee: String,
    #[serde(rename = "volume24h")]
    pub volume_24h: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolList {
    pub pools: Vec<PoolSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolDetail {
    pub id: String,
    pub chain: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: String,
    pub reserve1: String,
    pub fee: String,
    pub tvl: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub address: String,
    pub chain: String,
    pub balance: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub chain: String,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out: String,
    pub tx_hash: String,
    pub recipient: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionList {
    pub transactions: Vec<TransactionRecord>,
    pub total: usize,
}

pub struct DexClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DexClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send `Authorization: Bearer <key>` on admin calls.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub async fn swap(&self, req: &SwapRequest) -> Result<SwapResponse, SdkError> {
        self.send(self.client.post(self.url("/api/swap")).json(req)).await
    }

    pub async fn create_pool(&self, req: &CreatePoolRequest) -> Result<CreatedPool, SdkError> {
        self.send(self.client.post(self.url("/api/pools")).json(req)).await
    }

    pub async fn list_pools(&self, chain: Option<&str>) -> Result<PoolList, SdkError> {
        let mut builder = self.client.get(self.url("/api/pools"));
        if let Some(chain) = chain {
            builder = builder.query(&[("chain", chain)]);
        }
        self.send(builder).await
    }

    pub async fn pool(&self, id: &str, chain: Option<&str>) -> Result<PoolDetail, SdkError> {
        let mut builder = self.client.get(self.url(&format!("/api/pools/{}", id)));
        if let Some(chain) = chain {
            builder = builder.query(&[("chain", chain)]);
        }
        self.send(builder).await
    }

    pub async fn balance(&self, address: &str, chain: &str) -> Result<BalanceResponse, SdkError> {
        self.send(
            self.client
                .get(self.url(&format!("/api/balance/{}", address)))
                .query(&[("chain", chain)]),
        )
        .await
    }

    pub async fn price(&self, token: &str) -> Result<serde_json::Value, SdkError> {
        self.send(self.client.get(self.url(&format!("/api/price/{}", token)))).await
    }

    pub async fn bridge(
        &self,
        from_chain: &str,
        to_chain: &str,
        amount: &str,
        token: &str,
    ) -> Result<serde_json::Value, SdkError> {
        let body = serde_json::json!({
            "fromChain": from_chain,
            "toChain": to_chain,
            "amount": amount,
            "token": token,
        });
        self.send(self.client.post(self.url("/api/bridge")).json(&body)).await
    }

    pub async fn stats(&self) -> Result<serde_json::Value, SdkError> {
        self.send(self.admin(self.client.get(self.url("/api/admin/stats")))).await
    }

    pub async fn admin_health(&self) -> Result<serde_json::Value, SdkError> {
        self.send(self.admin(self.client.get(self.url("/api/admin/health")))).await
    }

    pub async fn transactions(
        &self,
        limit: Option<usize>,
        chain: Option<&str>,
    ) -> Result<TransactionList, SdkError> {
        let mut builder = self.admin(self.client.get(self.url("/api/admin/transactions")));
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit.to_string())]);
        }
        if let Some(chain) = chain {
            builder = builder.query(&[("chain", chain)]);
        }
        self.send(builder).await
    }

    pub async fn health(&self) -> Result<serde_json::Value, SdkError> {
        self.send(self.client.get(self.url("/health"))).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, SdkError> {
        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                .unwrap_or(text);
            return Err(SdkError::Api { status, message });
        }

        serde_json::from_str(&text).map_err(SdkError::Decode)
    }
}
