//! Ethereum JSON-RPC client

use crate::config::{BlockTag, RetryConfig, RpcConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};
use unruggable_core::Address;

/// JSON-RPC code geth and most providers use for execution reverts
const EXECUTION_REVERTED: i64 = 3;

/// Result of an `eth_call`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// Call returned data, possibly empty
    Return(Vec<u8>),
    /// Call reverted, with the node's message
    Reverted(String),
}

/// Anything that can run a read-only contract call
#[async_trait]
pub trait EthCaller: Send + Sync {
    /// Execute `data` against `to` at the configured block
    async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<CallOutcome>;
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: &'a Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    #[serde(default)]
    message: String,
}

/// JSON-RPC client over HTTP
pub struct RpcClient {
    endpoint: String,
    block: BlockTag,
    retry: RetryConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create new client with default settings
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_config(&RpcConfig::with_endpoint(endpoint))
    }

    /// Create new client from config
    pub fn with_config(config: &RpcConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            block: config.block,
            retry: config.retry.clone(),
            client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Get endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get block reads are pinned to
    pub fn block(&self) -> BlockTag {
        self.block
    }

    /// Call a JSON-RPC method, retrying transient failures
    pub async fn call_raw(&self, method: &str, params: Value) -> Result<Value> {
        self.with_retry(method, || self.send(method, &params)).await
    }

    async fn send(&self, method: &str, params: &Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        let reply: RpcResponse = serde_json::from_slice(&body)?;

        if let Some(error) = reply.error {
            return Err(Error::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        reply
            .result
            .ok_or_else(|| Error::Abi(format!("{} response has neither result nor error", method)))
    }

    async fn with_retry<F, Fut, T>(&self, method: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T>> + Send,
    {
        let mut attempt = 0;
        let mut backoff = self.retry.initial_backoff();

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if !e.is_transient() => return Err(e),
                Err(e) => {
                    attempt += 1;
                    if attempt >= self.retry.max_attempts.max(1) {
                        return Err(Error::Unavailable {
                            attempts: attempt,
                            last: e.to_string(),
                        });
                    }

                    warn!(
                        "{} failed (attempt {}), retrying in {:?}: {}",
                        method, attempt, backoff, e
                    );

                    tokio::time::sleep(jitter_duration(backoff)).await;
                    backoff = self.retry.next_backoff(backoff);
                }
            }
        }
    }

    /// Chain id the endpoint serves
    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.call_raw("eth_chainId", json!([])).await?;
        parse_quantity(&value)
    }

    /// Latest block number
    pub async fn block_number(&self) -> Result<u64> {
        let value = self.call_raw("eth_blockNumber", json!([])).await?;
        parse_quantity(&value)
    }
}

#[async_trait]
impl EthCaller for RpcClient {
    async fn eth_call(&self, to: &Address, data: &[u8]) -> Result<CallOutcome> {
        let params = json!([
            {
                "to": format!("0x{}", to.to_lower_hex()),
                "data": format!("0x{}", hex::encode(data)),
            },
            self.block.to_param(),
        ]);

        match self.call_raw("eth_call", params).await {
            Ok(value) => {
                let bytes = parse_data(&value)?;
                debug!("eth_call to {} returned {} bytes", to, bytes.len());
                Ok(CallOutcome::Return(bytes))
            }
            Err(Error::Rpc { code, message })
                if code == EXECUTION_REVERTED || message.to_ascii_lowercase().contains("revert") =>
            {
                debug!("eth_call to {} reverted: {}", to, message);
                Ok(CallOutcome::Reverted(message))
            }
            Err(e) => Err(e),
        }
    }
}

fn parse_data(value: &Value) -> Result<Vec<u8>> {
    let s = value
        .as_str()
        .ok_or_else(|| Error::Abi(format!("expected hex string, got {}", value)))?;
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| Error::Abi(format!("invalid hex data: {}", e)))
}

fn parse_quantity(value: &Value) -> Result<u64> {
    let s = value
        .as_str()
        .ok_or_else(|| Error::Abi(format!("expected quantity, got {}", value)))?;
    let digits = s
        .strip_prefix("0x")
        .ok_or_else(|| Error::Abi(format!("quantity {:?} lacks 0x prefix", s)))?;
    u64::from_str_radix(digits, 16).map_err(|e| Error::Abi(format!("invalid quantity {:?}: {}", s, e)))
}

/// Apply +/-20% jitter to a backoff
fn jitter_duration(duration: Duration) -> Duration {
    let millis = duration.as_millis() as u64;
    if millis == 0 {
        return duration;
    }
    let jitter = rand::thread_rng().gen_range(0.8..1.2);
    let jittered = (millis as f64 * jitter) as u64;
    Duration::from_millis(jittered.max(1))
}
