//! Lookup entry point

use crate::address::Address;
use crate::gateways::GatewaySetResolver;
use crate::name::EncodedName;
use crate::namehash::Node;
use crate::registry::Registry;
use crate::walker::{RegistryWalker, WalkerConfig};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;

/// Verifier and ordered gateways for a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupResult {
    /// Verifier contract
    pub verifier: Address,
    /// Gateway URLs, deduplicated, in registration order
    pub gateways: Vec<String>,
}

impl LookupResult {
    /// Split into `(verifier, gateways)`
    pub fn into_pair(self) -> (Address, Vec<String>) {
        (self.verifier, self.gateways)
    }
}

/// Lookup result with the suffix that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// Name that was looked up
    pub name: String,
    /// Matched suffix (`""` for the root)
    pub matched: String,
    /// Namehash of the matched suffix
    pub node: Node,
    /// Labels stripped to reach the match
    pub depth: usize,
    /// Verifier and gateways
    #[serde(flatten)]
    pub result: LookupResult,
}

/// Decodes names, walks the registry and normalizes gateways.
///
/// Nothing is cached: every call reads the registry again.
#[derive(Clone)]
pub struct LookupFacade {
    walker: RegistryWalker,
    gateways: GatewaySetResolver,
}

impl LookupFacade {
    /// Create new facade over `registry`
    pub fn new(registry: Arc<dyn Registry>, config: WalkerConfig) -> Self {
        Self {
            walker: RegistryWalker::new(registry, config),
            gateways: GatewaySetResolver::new(),
        }
    }

    /// Underlying walker
    pub fn walker(&self) -> &RegistryWalker {
        &self.walker
    }

    /// Verifier and gateways of the longest registered suffix
    pub async fn find(&self, name: &EncodedName) -> Result<LookupResult> {
        Ok(self.trace(name).await?.result)
    }

    /// Like [`LookupFacade::find`] for raw wire bytes
    pub async fn find_bytes(&self, bytes: &[u8]) -> Result<LookupResult> {
        let name = EncodedName::from_bytes(bytes)?;
        self.find(&name).await
    }

    /// Like [`LookupFacade::find`] for a dotted name
    pub async fn find_name(&self, name: &str) -> Result<LookupResult> {
        let name = EncodedName::encode(name)?;
        self.find(&name).await
    }

    /// Lookup that also reports which suffix matched
    pub async fn trace(&self, name: &EncodedName) -> Result<Resolution> {
        let found = self.walker.walk(name).await?;
        let gateways = self.gateways.resolve(&found.entry);
        Ok(Resolution {
            name: name.to_dotted(),
            matched: found.suffix,
            node: found.node,
            depth: found.depth,
            result: LookupResult {
                verifier: found.entry.verifier,
                gateways,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{MemoryRegistry, RegistryEntry};
    use crate::Error;

    fn facade() -> LookupFacade {
        let registry = MemoryRegistry::new().with_entry(
            "eth",
            RegistryEntry::new(
                Address::new([7; 20]),
                vec!["https://a".to_string(), "https://a".to_string(), "https://b".to_string()],
            ),
        );
        LookupFacade::new(Arc::new(registry), WalkerConfig::default())
    }

    #[tokio::test]
    async fn test_find_dedups_gateways() {
        let result = facade().find_name("nick.eth").await.unwrap();
        assert_eq!(result.verifier, Address::new([7; 20]));
        assert_eq!(result.gateways, vec!["https://a", "https://b"]);
    }

    #[tokio::test]
    async fn test_find_bytes_propagates_malformed() {
        let err = facade().find_bytes(&[4, b'n', b'i', 0]).await.unwrap_err();
        assert!(matches!(err, Error::MalformedEncoding(_)));
    }

    #[tokio::test]
    async fn test_find_propagates_not_found() {
        let err = facade().find_name("nick.xyz").await.unwrap_err();
        assert!(matches!(err, Error::NoResolverFound(_)));
    }

    #[tokio::test]
    async fn test_trace_reports_match() {
        let name = EncodedName::encode("nick.eth").unwrap();
        let resolution = facade().trace(&name).await.unwrap();
        assert_eq!(resolution.name, "nick.eth");
        assert_eq!(resolution.matched, "eth");
        assert_eq!(resolution.depth, 1);

        let json = serde_json::to_value(&resolution).unwrap();
        assert_eq!(json["matched"], "eth");
        assert_eq!(json["gateways"][1], "https://b");
    }

    #[test]
    fn test_into_pair() {
        let (verifier, gateways) = LookupResult {
            verifier: Address::ZERO,
            gateways: vec![],
        }
        .into_pair();
        assert!(verifier.is_zero());
        assert!(gateways.is_empty());
    }
}
