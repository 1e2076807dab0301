//! Finder configuration
//!
//! Settings are layered: defaults, then the JSON config file, then
//! `UNRUGGABLE_*` environment variables, then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use unruggable_core::{Address, WalkStrategy, WalkerConfig, DEFAULT_QUERY_TIMEOUT};
use unruggable_rpc::{BlockTag, RpcConfig};

/// JSON-RPC endpoint override
pub const ENV_RPC_URL: &str = "UNRUGGABLE_RPC_URL";
/// ENS registry address override
pub const ENV_REGISTRY: &str = "UNRUGGABLE_REGISTRY";
/// Timeout override, in seconds
pub const ENV_TIMEOUT_SECS: &str = "UNRUGGABLE_TIMEOUT_SECS";
/// Speculative walk toggle
pub const ENV_SPECULATIVE: &str = "UNRUGGABLE_SPECULATIVE";

/// Walker settings (serializable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkerSettings {
    /// Query scheduling
    pub strategy: WalkStrategy,
    /// Bound on each registry query in seconds
    pub query_timeout_secs: u64,
}

impl Default for WalkerSettings {
    fn default() -> Self {
        Self {
            strategy: WalkStrategy::Sequential,
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT.as_secs(),
        }
    }
}

impl From<&WalkerSettings> for WalkerConfig {
    fn from(settings: &WalkerSettings) -> Self {
        WalkerConfig {
            strategy: settings.strategy,
            query_timeout: Duration::from_secs(settings.query_timeout_secs.max(1)),
        }
    }
}

/// Persistent finder configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// JSON-RPC settings
    pub rpc: RpcConfig,
    /// Walker settings
    pub walker: WalkerSettings,
    /// Registry snapshot for offline lookups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,
}

/// Flag values that override the config
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--rpc-url`
    pub rpc_url: Option<String>,
    /// `--registry`
    pub registry: Option<String>,
    /// `--block`
    pub block: Option<String>,
    /// `--timeout-secs`
    pub timeout_secs: Option<u64>,
    /// `--speculative`
    pub speculative: bool,
    /// `--snapshot`
    pub snapshot: Option<PathBuf>,
}

impl FinderConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolve the full layering
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides)?;
        Ok(config)
    }

    /// Apply `UNRUGGABLE_*` variables read through `var`
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = var(ENV_RPC_URL) {
            if !value.trim().is_empty() {
                self.rpc.endpoint = value.trim().to_string();
            }
        }
        if let Some(value) = var(ENV_REGISTRY) {
            if !value.trim().is_empty() {
                self.rpc.registry = parse_registry(&value)
                    .with_context(|| format!("Invalid {}", ENV_REGISTRY))?;
            }
        }
        if let Some(value) = var(ENV_TIMEOUT_SECS) {
            if let Ok(secs) = value.trim().parse::<u64>() {
                self.set_timeout(secs);
            }
        }
        if let Some(value) = var(ENV_SPECULATIVE) {
            self.walker.strategy = if parse_bool_env(&value) {
                WalkStrategy::Speculative
            } else {
                WalkStrategy::Sequential
            };
        }
        Ok(())
    }

    /// Apply command-line flags
    pub fn apply_overrides(&mut self, overrides: &Overrides) -> Result<()> {
        if let Some(url) = &overrides.rpc_url {
            self.rpc.endpoint = url.clone();
        }
        if let Some(registry) = &overrides.registry {
            self.rpc.registry = parse_registry(registry).context("Invalid --registry")?;
        }
        if let Some(block) = &overrides.block {
            self.rpc.block = block
                .parse::<BlockTag>()
                .map_err(anyhow::Error::from)
                .context("Invalid --block")?;
        }
        if let Some(secs) = overrides.timeout_secs {
            self.set_timeout(secs);
        }
        if overrides.speculative {
            self.walker.strategy = WalkStrategy::Speculative;
        }
        if let Some(snapshot) = &overrides.snapshot {
            self.snapshot = Some(snapshot.clone());
        }
        Ok(())
    }

    /// Walker config for the lookup facade
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::from(&self.walker)
    }

    /// Set the per-query timeout and split it across the RPC attempts,
    /// so a timed-out request can still be retried inside one query.
    fn set_timeout(&mut self, secs: u64) {
        let secs = secs.max(1);
        let attempts = u64::from(self.rpc.retry.max_attempts.max(1));
        self.walker.query_timeout_secs = secs;
        self.rpc.request_timeout_secs = (secs / attempts).max(1);
    }
}

fn parse_registry(value: &str) -> Result<Address> {
    Ok(Address::parse(value.trim())?)
}

fn parse_bool_env(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
