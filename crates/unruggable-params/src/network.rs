//! Chain definitions

use crate::coin_type::evm_coin_type;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// ENS registry (same address on every L1 deployment)
pub const ENS_REGISTRY: &str = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e";

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    /// Ethereum mainnet
    Mainnet,
    /// Ethereum Sepolia testnet
    Sepolia,
    /// Base mainnet
    Base,
    /// Base Sepolia testnet
    BaseSepolia,
}

/// Network configuration
#[derive(Debug, Clone)]
pub struct Network {
    /// Network type
    pub network_type: NetworkType,
    /// Human-readable name
    pub name: &'static str,
    /// EIP-155 chain id
    pub chain_id: u64,
    /// Public JSON-RPC endpoint used when none is configured
    pub default_rpc_url: &'static str,
    /// ENS registry, only deployed on L1s
    pub ens_registry: Option<&'static str>,
}

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            name: "mainnet",
            chain_id: 1,
            default_rpc_url: "https://mainnet.gateway.tenderly.co",
            ens_registry: Some(ENS_REGISTRY),
        }
    }

    /// Get Sepolia parameters
    pub const fn sepolia() -> Self {
        Self {
            network_type: NetworkType::Sepolia,
            name: "sepolia",
            chain_id: 11_155_111,
            default_rpc_url: "https://sepolia.gateway.tenderly.co",
            ens_registry: Some(ENS_REGISTRY),
        }
    }

    /// Get Base parameters
    pub const fn base() -> Self {
        Self {
            network_type: NetworkType::Base,
            name: "base",
            chain_id: 8453,
            default_rpc_url: "https://mainnet.base.org",
            ens_registry: None,
        }
    }

    /// Get Base Sepolia parameters
    pub const fn base_sepolia() -> Self {
        Self {
            network_type: NetworkType::BaseSepolia,
            name: "base-sepolia",
            chain_id: 84_532,
            default_rpc_url: "https://sepolia.base.org",
            ens_registry: None,
        }
    }

    /// Get network by type
    pub const fn from_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Sepolia => Self::sepolia(),
            NetworkType::Base => Self::base(),
            NetworkType::BaseSepolia => Self::base_sepolia(),
        }
    }

    /// All known networks
    pub fn all() -> [Self; 4] {
        [
            Self::mainnet(),
            Self::sepolia(),
            Self::base(),
            Self::base_sepolia(),
        ]
    }

    /// Look up a network by name (`mainnet`, `base`, ...)
    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        let wanted = match wanted.as_str() {
            "ethereum" | "eth" | "l1" => "mainnet",
            other => other,
        };
        Self::all()
            .into_iter()
            .find(|net| net.name == wanted)
            .ok_or_else(|| Error::UnknownChain(name.to_string()))
    }

    /// Look up a network by chain id
    pub fn from_chain_id(chain_id: u64) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|net| net.chain_id == chain_id)
            .ok_or_else(|| Error::UnknownChain(chain_id.to_string()))
    }

    /// ENSIP-11 coin type for this chain
    pub const fn coin_type(&self) -> u32 {
        evm_coin_type(self.chain_id)
    }

    /// Check if the ENS registry lives on this chain
    pub const fn has_ens_registry(&self) -> bool {
        self.ens_registry.is_some()
    }
}
