//! Ethereum JSON-RPC registry client
//!
//! Implements [`unruggable_core::Registry`] against the on-chain ENS registry
//! using `eth_call`. Transient transport failures are retried with backoff.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod registry;

pub use client::{CallOutcome, EthCaller, RpcClient};
pub use config::{BlockTag, RetryConfig, RpcConfig, ENS_REGISTRY_ADDRESS};
pub use error::{Error, Result};
pub use registry::EnsRegistry;
