//! Chain parameters and constants for unruggable name lookups
//!
//! This crate provides chain identifiers, default RPC endpoints, the ENS
//! registry deployment, and ENSIP-11 coin type derivation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coin_type;
pub mod network;

pub use coin_type::{evm_coin_type, COIN_TYPE_DEFAULT, COIN_TYPE_ETH, EVM_BIT};
pub use network::{Network, NetworkType, ENS_REGISTRY};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Unknown chain name or id
    #[error("Unknown chain: {0}")]
    UnknownChain(String),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
