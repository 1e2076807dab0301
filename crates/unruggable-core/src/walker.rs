//! Longest-suffix registry walk
//!
//! For `raffy.teamnick.eth` the registry is asked about
//! `raffy.teamnick.eth`, `teamnick.eth`, `eth` and the root, in that order
//! of precedence. The first suffix with an entry wins, so a less specific
//! registration never shadows a more specific one.

use crate::name::EncodedName;
use crate::namehash::{suffix_nodes, Node};
use crate::registry::{Registry, RegistryEntry, RegistryKey};
use crate::{Error, Result};
use futures_util::stream::{FuturesOrdered, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default bound on a single registry query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// How suffix queries are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkStrategy {
    /// One query at a time, longest suffix first
    #[default]
    Sequential,
    /// All queries in flight at once; shorter suffixes are dropped as soon
    /// as a longer one matches
    Speculative,
}

/// Walker configuration
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Query scheduling
    pub strategy: WalkStrategy,
    /// Bound on each registry query
    pub query_timeout: Duration,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            strategy: WalkStrategy::Sequential,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

impl WalkerConfig {
    /// Config with the speculative strategy
    pub fn speculative() -> Self {
        Self {
            strategy: WalkStrategy::Speculative,
            ..Default::default()
        }
    }

    /// Set the per-query timeout
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// Most specific registered suffix of a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkMatch {
    /// Entry found
    pub entry: RegistryEntry,
    /// Dotted suffix that matched (`""` for the root)
    pub suffix: String,
    /// Namehash of the suffix
    pub node: Node,
    /// Labels stripped from the full name to reach the suffix
    pub depth: usize,
}

/// Walks name suffixes against a registry
#[derive(Clone)]
pub struct RegistryWalker {
    registry: Arc<dyn Registry>,
    config: WalkerConfig,
}

impl RegistryWalker {
    /// Create new walker
    pub fn new(registry: Arc<dyn Registry>, config: WalkerConfig) -> Self {
        Self { registry, config }
    }

    /// Current configuration
    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    /// Find the entry of the longest registered suffix of `name`
    pub async fn walk(&self, name: &EncodedName) -> Result<WalkMatch> {
        let labels = name.labels();
        let keys: Vec<RegistryKey<'_>> = suffix_nodes(&labels)
            .into_iter()
            .zip(name.suffix_offsets())
            .enumerate()
            .map(|(depth, (node, offset))| RegistryKey::new(name, depth, offset, node))
            .collect();

        let found = match self.config.strategy {
            WalkStrategy::Sequential => self.walk_sequential(&keys).await?,
            WalkStrategy::Speculative => self.walk_speculative(&keys).await?,
        };

        let Some((depth, entry)) = found else {
            debug!("No suffix of {} is registered", name);
            return Err(Error::NoResolverFound(name.to_string()));
        };

        let suffix = name.suffix_dotted(depth).unwrap_or_default();
        info!(
            "Matched {} at suffix {:?} (depth {}): verifier {}",
            name, suffix, depth, entry.verifier
        );
        Ok(WalkMatch {
            entry,
            suffix,
            node: keys[depth].node(),
            depth,
        })
    }

    async fn walk_sequential(
        &self,
        keys: &[RegistryKey<'_>],
    ) -> Result<Option<(usize, RegistryEntry)>> {
        for key in keys {
            if let Some(entry) = self.query(key).await? {
                return Ok(Some((key.depth(), entry)));
            }
        }
        Ok(None)
    }

    async fn walk_speculative(
        &self,
        keys: &[RegistryKey<'_>],
    ) -> Result<Option<(usize, RegistryEntry)>> {
        // Yields in push order (longest first) while every query runs
        // concurrently; returning early drops, and so cancels, the rest.
        let mut pending: FuturesOrdered<_> = keys
            .iter()
            .map(|key| async move { (key.depth(), self.query(key).await) })
            .collect();

        while let Some((depth, result)) = pending.next().await {
            if let Some(entry) = result? {
                return Ok(Some((depth, entry)));
            }
        }
        Ok(None)
    }

    async fn query(&self, key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        debug!(
            "Querying registry for {} depth {} (suffix 0x{}, node {})",
            key.name(),
            key.depth(),
            hex::encode(key.suffix()),
            key.node()
        );
        match tokio::time::timeout(self.config.query_timeout, self.registry.lookup(key)).await {
            Ok(result) => result,
            Err(_) => Err(Error::RegistryUnavailable(format!(
                "lookup of {} timed out after {:?}",
                key.node(),
                self.config.query_timeout
            ))),
        }
    }
}
