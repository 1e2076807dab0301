//! RPC configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use unruggable_core::Address;
use unruggable_params::Network;

/// ENS registry, `0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e`
pub const ENS_REGISTRY_ADDRESS: Address = Address::new([
    0x00, 0x00, 0x00, 0x00, 0x00, 0x0c, 0x2e, 0x07, 0x4e, 0xc6, 0x9a, 0x0d, 0xfb, 0x29, 0x97, 0xba,
    0x6c, 0x7d, 0x2e, 0x1e,
]);

/// Chain state that reads are pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockTag {
    /// Most recent block
    #[default]
    Latest,
    /// Fixed block height
    Number(u64),
}

impl BlockTag {
    /// JSON-RPC parameter form
    pub fn to_param(&self) -> String {
        match self {
            BlockTag::Latest => "latest".to_string(),
            BlockTag::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => write!(f, "latest"),
            BlockTag::Number(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for BlockTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("latest") {
            return Ok(BlockTag::Latest);
        }
        let parsed = match s.strip_prefix("0x") {
            Some(digits) => u64::from_str_radix(digits, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(BlockTag::Number)
            .map_err(|e| Error::Config(format!("invalid block {:?}: {}", s, e)))
    }
}

/// Retry configuration for network operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum attempts, including the first
    pub max_attempts: u32,
    /// Initial backoff in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff in milliseconds
    pub max_backoff_ms: u64,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 5_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Initial backoff duration
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Maximum backoff duration
    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// Backoff after `current`, capped at the maximum
    pub fn next_backoff(&self, current: Duration) -> Duration {
        std::cmp::min(
            Duration::from_millis((current.as_millis() as f64 * self.backoff_multiplier) as u64),
            self.max_backoff(),
        )
    }
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL
    pub endpoint: String,
    /// ENS registry contract
    pub registry: Address,
    /// Block reads are pinned to
    pub block: BlockTag,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
    /// Retry configuration
    pub retry: RetryConfig,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: Network::mainnet().default_rpc_url.to_string(),
            registry: ENS_REGISTRY_ADDRESS,
            block: BlockTag::Latest,
            request_timeout_secs: 3,
            retry: RetryConfig::default(),
        }
    }
}

impl RpcConfig {
    /// Default config for a known network.
    ///
    /// Fails for networks without an ENS registry.
    pub fn for_network(network: &Network) -> Result<Self> {
        let registry = network.ens_registry.ok_or_else(|| {
            Error::Config(format!("no ENS registry on {}", network.name))
        })?;
        let registry = Address::parse(registry).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            endpoint: network.default_rpc_url.to_string(),
            registry,
            ..Default::default()
        })
    }

    /// Config for a custom endpoint
    pub fn with_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            ..Default::default()
        }
    }

    /// Request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
