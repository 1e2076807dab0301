//! Unruggable gateway lookup
//!
//! Given a DNS-encoded name, finds the verifier and gateway URLs registered
//! for its most specific ancestor. The registry itself is a collaborator
//! behind the [`Registry`] trait.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod error;
pub mod gateways;
pub mod lookup;
pub mod name;
pub mod namehash;
pub mod registry;
pub mod reverse;
pub mod walker;

pub use address::Address;
pub use error::{Error, ErrorCategory, Result};
pub use gateways::{dedup_gateways, GatewaySetResolver};
pub use lookup::{LookupFacade, LookupResult, Resolution};
pub use name::{decode, EncodedName, MAX_LABEL_LEN};
pub use namehash::{keccak256, labelhash, namehash, suffix_nodes, Node};
pub use registry::{
    MemoryRegistry, Registry, RegistryEntry, RegistryKey, RegistrySnapshot, SnapshotEntry,
};
pub use reverse::reverse_name;
pub use walker::{RegistryWalker, WalkMatch, WalkStrategy, WalkerConfig, DEFAULT_QUERY_TIMEOUT};
