//! Registry collaborator
//!
//! The walker only needs one capability from the outside world: given the
//! key of a suffix, return the entry registered there, if any. Production
//! code talks to a chain; tests and offline runs use [`MemoryRegistry`].

use crate::address::Address;
use crate::name::EncodedName;
use crate::namehash::{namehash, Node};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Verifier and gateways registered for a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Verifier contract
    pub verifier: Address,
    /// Gateway URLs in registration order (may contain duplicates)
    #[serde(default)]
    pub gateways: Vec<String>,
}

impl RegistryEntry {
    /// Create new entry
    pub fn new(verifier: Address, gateways: Vec<String>) -> Self {
        Self { verifier, gateways }
    }
}

/// Key handed to the registry for one suffix of a name
#[derive(Debug, Clone, Copy)]
pub struct RegistryKey<'a> {
    name: &'a EncodedName,
    offset: usize,
    depth: usize,
    node: Node,
}

impl<'a> RegistryKey<'a> {
    /// Key for the suffix of `name` that drops the first `depth` labels
    pub fn new(name: &'a EncodedName, depth: usize, offset: usize, node: Node) -> Self {
        Self {
            name,
            offset,
            depth,
            node,
        }
    }

    /// Namehash of the suffix
    pub fn node(&self) -> Node {
        self.node
    }

    /// Full name being looked up
    pub fn name(&self) -> &'a EncodedName {
        self.name
    }

    /// Number of labels stripped from the full name
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Wire bytes of the suffix, a tail slice of the full encoding
    pub fn suffix(&self) -> &'a [u8] {
        &self.name.as_bytes()[self.offset..]
    }
}

/// Read-only registry addressable by name hash
#[async_trait]
pub trait Registry: Send + Sync {
    /// Entry registered at `key`, or `None`.
    ///
    /// Transport failures must be reported as [`Error::RegistryUnavailable`],
    /// never as `Ok(None)`.
    async fn lookup(&self, key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>>;
}

/// One named entry in a snapshot file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Dotted name, `""` for the root
    pub name: String,
    /// Verifier contract
    pub verifier: Address,
    /// Gateway URLs
    #[serde(default)]
    pub gateways: Vec<String>,
}

/// Serializable registry contents at one chain state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Free-form label (chain, block, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entries
    pub entries: Vec<SnapshotEntry>,
}

impl RegistrySnapshot {
    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidSnapshot(format!("Failed to parse snapshot: {}", e)))
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidSnapshot(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidSnapshot(format!("Failed to serialize snapshot: {}", e)))
    }
}

/// In-memory registry keyed by namehash
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    entries: HashMap<Node, RegistryEntry>,
}

impl MemoryRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` at a dotted name, replacing any previous entry
    pub fn register(&mut self, name: &str, entry: RegistryEntry) -> Option<RegistryEntry> {
        self.entries.insert(namehash(name), entry)
    }

    /// Builder form of [`MemoryRegistry::register`]
    pub fn with_entry(mut self, name: &str, entry: RegistryEntry) -> Self {
        self.register(name, entry);
        self
    }

    /// Build from a snapshot; later entries for the same name win
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let mut registry = Self::new();
        for entry in snapshot.entries {
            registry.register(&entry.name, RegistryEntry::new(entry.verifier, entry.gateways));
        }
        registry
    }

    /// Entry registered at `node`
    pub fn get(&self, node: &Node) -> Option<&RegistryEntry> {
        self.entries.get(node)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn lookup(&self, key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        Ok(self.entries.get(&key.node()).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    #[tokio::test]
    async fn test_memory_lookup() {
        let registry = MemoryRegistry::new().with_entry(
            "teamnick.eth",
            RegistryEntry::new(verifier(1), vec!["https://a".to_string()]),
        );
        let name = EncodedName::encode("teamnick.eth").unwrap();
        let key = RegistryKey::new(&name, 0, 0, namehash("teamnick.eth"));
        let entry = registry.lookup(&key).await.unwrap().unwrap();
        assert_eq!(entry.verifier, verifier(1));

        let key = RegistryKey::new(&name, 1, 9, namehash("eth"));
        assert!(registry.lookup(&key).await.unwrap().is_none());
    }

    #[test]
    fn test_key_suffix() {
        let name = EncodedName::encode("raffy.eth").unwrap();
        let key = RegistryKey::new(&name, 1, 6, namehash("eth"));
        assert_eq!(key.suffix(), &[3, b'e', b't', b'h', 0][..]);
        assert_eq!(key.depth(), 1);
    }

    #[test]
    fn test_missing_snapshot_is_input_error() {
        let err = RegistrySnapshot::load("/nonexistent/snapshot.json").unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.is_input_error());
        assert!(err.to_string().contains("/nonexistent/snapshot.json"));
    }

    #[test]
    fn test_malformed_snapshot_is_input_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{ \"entries\": [").unwrap();

        let err = RegistrySnapshot::load(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidSnapshot(_)), "{:?}", err);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = MemoryRegistry::new();
        assert!(registry
            .register("eth", RegistryEntry::new(verifier(1), vec![]))
            .is_none());
        let previous = registry.register("eth", RegistryEntry::new(verifier(2), vec![]));
        assert_eq!(previous.unwrap().verifier, verifier(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(&namehash("eth")).unwrap().verifier, verifier(2));
    }

    #[test]
    fn test_snapshot_json() {
        let json = r#"{
            "description": "mainnet fork",
            "entries": [
                {
                    "name": "teamnick.eth",
                    "verifier": "0x82304c5f4a08cfa38542664c5b78e1969ca49cec",
                    "gateways": ["https://lb.drpc.org/gateway/unruggable?network=base"]
                },
                { "name": "", "verifier": "0x0000000000000000000000000000000000000001" }
            ]
        }"#;
        let snapshot = RegistrySnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.entries.len(), 2);
        assert!(snapshot.entries[1].gateways.is_empty());

        let registry = MemoryRegistry::from_snapshot(snapshot.clone());
        assert_eq!(registry.len(), 2);
        assert!(registry.get(&Node::ROOT).is_some());

        let back = RegistrySnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_snapshot_rejects_bad_address() {
        let json = r#"{ "entries": [ { "name": "eth", "verifier": "0x12" } ] }"#;
        assert!(RegistrySnapshot::from_json(json).is_err());
    }
}
