//! ENS-backed registry
//!
//! Each suffix lookup is two reads: the ENS registry's `resolver(node)` and,
//! when a resolver is set, its `verifierMetadata(name)`. The full name goes to
//! the resolver so wildcard resolvers see what is actually being resolved.

use crate::abi;
use crate::client::{CallOutcome, EthCaller, RpcClient};
use crate::config::RpcConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use tracing::debug;
use unruggable_core::{Address, Node, Registry, RegistryEntry, RegistryKey};

const RESOLVER_SIG: &str = "resolver(bytes32)";
const VERIFIER_METADATA_SIG: &str = "verifierMetadata(bytes)";

/// Registry that reads ENS over an [`EthCaller`]
pub struct EnsRegistry<C = RpcClient> {
    caller: C,
    registry: Address,
}

impl EnsRegistry<RpcClient> {
    /// Create new registry over JSON-RPC
    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        Ok(Self::new(RpcClient::with_config(config)?, config.registry))
    }
}

impl<C: EthCaller> EnsRegistry<C> {
    /// Create new registry reading `registry` through `caller`
    pub fn new(caller: C, registry: Address) -> Self {
        Self { caller, registry }
    }

    /// Get registry contract address
    pub fn registry_address(&self) -> Address {
        self.registry
    }

    /// Get underlying caller
    pub fn caller(&self) -> &C {
        &self.caller
    }

    /// Resolver set for `node`, if any
    pub async fn resolver(&self, node: &Node) -> Result<Option<Address>> {
        let data = abi::encode_bytes32_call(abi::selector(RESOLVER_SIG), node.as_bytes());
        match self.caller.eth_call(&self.registry, &data).await? {
            CallOutcome::Reverted(message) => Err(Error::Abi(format!(
                "registry {} reverted on resolver({}): {}",
                self.registry, node, message
            ))),
            CallOutcome::Return(bytes) if bytes.is_empty() => Err(Error::Abi(format!(
                "registry {} returned no data; is it deployed on this chain?",
                self.registry
            ))),
            CallOutcome::Return(bytes) => {
                let resolver = abi::decode_address(&bytes)?;
                Ok((!resolver.is_zero()).then_some(resolver))
            }
        }
    }

    /// Verifier metadata a resolver reports for `name`.
    ///
    /// `None` when the resolver does not implement it.
    pub async fn verifier_metadata(
        &self,
        resolver: &Address,
        name: &[u8],
    ) -> Result<Option<RegistryEntry>> {
        let data = abi::encode_bytes_call(abi::selector(VERIFIER_METADATA_SIG), name);
        match self.caller.eth_call(resolver, &data).await? {
            CallOutcome::Reverted(message) => {
                debug!("Resolver {} has no verifier metadata: {}", resolver, message);
                Ok(None)
            }
            CallOutcome::Return(bytes) if bytes.is_empty() => {
                debug!("Resolver {} returned no verifier metadata", resolver);
                Ok(None)
            }
            CallOutcome::Return(bytes) => {
                let (verifier, gateways) = abi::decode_address_and_strings(&bytes)?;
                if verifier.is_zero() {
                    return Ok(None);
                }
                Ok(Some(RegistryEntry::new(verifier, gateways)))
            }
        }
    }

    async fn lookup_node(&self, key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        let Some(resolver) = self.resolver(&key.node()).await? else {
            return Ok(None);
        };
        debug!("Suffix {} has resolver {}", key.node(), resolver);
        self.verifier_metadata(&resolver, key.name().as_bytes()).await
    }
}

#[async_trait]
impl<C: EthCaller> Registry for EnsRegistry<C> {
    async fn lookup(&self, key: &RegistryKey<'_>) -> unruggable_core::Result<Option<RegistryEntry>> {
        Ok(self.lookup_node(key).await?)
    }
}
