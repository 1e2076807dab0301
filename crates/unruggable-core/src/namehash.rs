//! ENS namehash
//!
//! Suffix keys are computed with the ENS convention, starting from the zero
//! node at the root and folding in one label hash per level:
//!
//! ```text
//! node("")         = 0x00..00
//! node(label.rest) = keccak256(node(rest) ++ keccak256(label))
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Keccak-256 of `input`
pub fn keccak256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Hash of a single label
pub fn labelhash(label: &str) -> [u8; 32] {
    keccak256(label.as_bytes())
}

/// A 32-byte ENS node
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Node([u8; 32]);

impl Node {
    /// Node of the root name
    pub const ROOT: Node = Node([0u8; 32]);

    /// Wrap raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the root node
    pub fn is_root(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Node of `label` directly below this one
    pub fn child(&self, label: &str) -> Node {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&self.0);
        buf[32..].copy_from_slice(&labelhash(label));
        Node(keccak256(&buf))
    }

    /// Parse `0x`-prefixed (or bare) 64-char hex
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidName(format!("invalid node {}: {}", s, e)))?;
        Ok(Node(bytes))
    }

    /// `0x`-prefixed lowercase hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.to_hex())
    }
}

impl From<[u8; 32]> for Node {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Node::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Namehash of labels given most-specific first
pub fn namehash_labels<S: AsRef<str>>(labels: &[S]) -> Node {
    labels
        .iter()
        .rev()
        .fold(Node::ROOT, |node, label| node.child(label.as_ref()))
}

/// Namehash of a dotted name; `""` is the root
pub fn namehash(name: &str) -> Node {
    if name.is_empty() {
        return Node::ROOT;
    }
    let labels: Vec<&str> = name.split('.').collect();
    namehash_labels(&labels)
}

/// Nodes of every suffix, longest first.
///
/// For `n` labels the result has `n + 1` entries: index `i` is the node of
/// `labels[i..]`, and the last entry is always the root.
pub fn suffix_nodes<S: AsRef<str>>(labels: &[S]) -> Vec<Node> {
    let mut nodes = vec![Node::ROOT; labels.len() + 1];
    for i in (0..labels.len()).rev() {
        nodes[i] = nodes[i + 1].child(labels[i].as_ref());
    }
    nodes
}
