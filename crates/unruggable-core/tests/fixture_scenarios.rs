//! Scenario tests against a registry snapshot
//!
//! The snapshot mirrors what mainnet returned for the two names below at the
//! time the fixtures were recorded. Every test builds its own fixture.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use unruggable_core::{
    reverse_name, Address, EncodedName, Error, LookupFacade, MemoryRegistry, Registry,
    RegistryEntry, RegistryKey, RegistrySnapshot, Result, WalkerConfig,
};
use unruggable_params::Network;

const DRPC_BASE: &str = "https://lb.drpc.org/gateway/unruggable?network=base";
const BASE_3668: &str = "https://base.3668.io";

const SNAPSHOT: &str = r#"{
    "description": "mainnet",
    "entries": [
        {
            "name": "eth",
            "verifier": "0x000000000000000000000000000000000000dead",
            "gateways": ["https://example.invalid/eth"]
        },
        {
            "name": "teamnick.eth",
            "verifier": "0x82304C5f4A08cfA38542664C5B78e1969cA49Cec",
            "gateways": ["https://lb.drpc.org/gateway/unruggable?network=base"]
        },
        {
            "name": "80002105.reverse",
            "verifier": "0x074C93CD956B0Dd2cAc0f9F11dDA4d3893a88149",
            "gateways": [
                "https://lb.drpc.org/gateway/unruggable?network=base",
                "https://base.3668.io",
                "https://lb.drpc.org/gateway/unruggable?network=base"
            ]
        }
    ]
}"#;

/// Counts lookups so tests can see how far a walk went
struct CountingRegistry {
    inner: MemoryRegistry,
    calls: AtomicUsize,
}

#[async_trait]
impl Registry for CountingRegistry {
    async fn lookup(&self, key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(key).await
    }
}

/// Fails every lookup as a transport outage would
struct DownRegistry;

#[async_trait]
impl Registry for DownRegistry {
    async fn lookup(&self, _key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        Err(Error::RegistryUnavailable("connection refused".to_string()))
    }
}

/// Never answers
struct HangingRegistry;

#[async_trait]
impl Registry for HangingRegistry {
    async fn lookup(&self, _key: &RegistryKey<'_>) -> Result<Option<RegistryEntry>> {
        std::future::pending::<()>().await;
        Ok(None)
    }
}

struct Fixture {
    registry: Arc<CountingRegistry>,
}

impl Fixture {
    fn new() -> Self {
        let snapshot = RegistrySnapshot::from_json(SNAPSHOT).expect("fixture snapshot");
        Self {
            registry: Arc::new(CountingRegistry {
                inner: MemoryRegistry::from_snapshot(snapshot),
                calls: AtomicUsize::new(0),
            }),
        }
    }

    fn facade(&self, config: WalkerConfig) -> LookupFacade {
        LookupFacade::new(self.registry.clone(), config)
    }

    fn calls(&self) -> usize {
        self.registry.calls.load(Ordering::SeqCst)
    }
}

fn checksummed(s: &str) -> Address {
    Address::parse_checksummed(s).unwrap()
}

#[tokio::test]
async fn test_teamnick_subname() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    let (verifier, gateways) = facade
        .find_name("raffy.teamnick.eth")
        .await
        .unwrap()
        .into_pair();

    assert_eq!(verifier.to_string(), "0x82304C5f4A08cfA38542664C5B78e1969cA49Cec");
    assert_eq!(gateways, vec![DRPC_BASE]);
    // raffy.teamnick.eth misses, teamnick.eth hits
    assert_eq!(fixture.calls(), 2);
}

#[tokio::test]
async fn test_base_primary_name() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    let owner = Address::parse("0x51050ec063d393217b436747617ad1c2285aeeee").unwrap();
    let name = reverse_name(&owner, Network::base().coin_type());
    assert_eq!(name, "51050ec063d393217b436747617ad1c2285aeeee.80002105.reverse");

    let result = facade.find_name(&name).await.unwrap();
    assert_eq!(
        result.verifier,
        checksummed("0x074C93CD956B0Dd2cAc0f9F11dDA4d3893a88149")
    );
    assert_eq!(result.gateways, vec![DRPC_BASE, BASE_3668]);
}

#[tokio::test]
async fn test_wire_bytes_input() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    // dnsEncode("raffy.teamnick.eth")
    let bytes = hex::decode("057261666679087465616d6e69636b0365746800").unwrap();
    assert_eq!(
        EncodedName::encode("raffy.teamnick.eth").unwrap().as_bytes(),
        bytes.as_slice()
    );

    let result = facade.find_bytes(&bytes).await.unwrap();
    assert_eq!(result.gateways, vec![DRPC_BASE]);
}

#[tokio::test]
async fn test_shorter_match_never_shadows() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    let other = facade.find_name("someone.eth").await.unwrap();
    assert_eq!(
        other.verifier,
        Address::parse("0x000000000000000000000000000000000000dead").unwrap()
    );

    let teamnick = facade.find_name("teamnick.eth").await.unwrap();
    assert_ne!(teamnick.verifier, other.verifier);
}

#[tokio::test]
async fn test_unregistered_name() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    let err = facade.find_name("raffy.xyz").await.unwrap_err();
    assert_eq!(err, Error::NoResolverFound("raffy.xyz".to_string()));
    // raffy.xyz, xyz, root
    assert_eq!(fixture.calls(), 3);
}

#[tokio::test]
async fn test_malformed_input() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());

    let err = facade.find_bytes(&[5, b'r', b'a', b'f']).await.unwrap_err();
    assert!(matches!(err, Error::MalformedEncoding(_)));
    assert_eq!(fixture.calls(), 0);
}

#[tokio::test]
async fn test_outage_is_not_a_negative_answer() {
    let facade = LookupFacade::new(Arc::new(DownRegistry), WalkerConfig::default());
    let err = facade.find_name("raffy.teamnick.eth").await.unwrap_err();
    assert!(matches!(err, Error::RegistryUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test(start_paused = true)]
async fn test_hanging_registry_times_out() {
    let config = WalkerConfig::speculative().with_query_timeout(Duration::from_secs(2));
    let facade = LookupFacade::new(Arc::new(HangingRegistry), config);
    let err = facade.find_name("raffy.teamnick.eth").await.unwrap_err();
    assert!(matches!(err, Error::RegistryUnavailable(_)), "{:?}", err);
}

#[tokio::test]
async fn test_speculative_parity() {
    for name in [
        "raffy.teamnick.eth",
        "teamnick.eth",
        "nick.eth",
        "51050ec063d393217b436747617ad1c2285aeeee.80002105.reverse",
        "nobody.xyz",
    ] {
        let sequential = Fixture::new()
            .facade(WalkerConfig::default())
            .find_name(name)
            .await;
        let speculative = Fixture::new()
            .facade(WalkerConfig::speculative())
            .find_name(name)
            .await;
        assert_eq!(sequential, speculative, "{}", name);
    }
}

#[tokio::test]
async fn test_trace_reports_matched_suffix() {
    let fixture = Fixture::new();
    let facade = fixture.facade(WalkerConfig::default());
    let name = EncodedName::encode("raffy.teamnick.eth").unwrap();

    let resolution = facade.trace(&name).await.unwrap();
    assert_eq!(resolution.matched, "teamnick.eth");
    assert_eq!(resolution.depth, 1);
}
