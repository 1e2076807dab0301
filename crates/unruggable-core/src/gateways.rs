//! Gateway list normalization

use crate::registry::RegistryEntry;
use std::collections::HashSet;

/// Remove exact duplicates, keeping the first occurrence of each URL
pub fn dedup_gateways<S: AsRef<str>>(gateways: &[S]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(gateways.len());
    gateways
        .iter()
        .map(AsRef::as_ref)
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

/// Produces the ordered gateway set of a registry entry
#[derive(Debug, Clone, Copy, Default)]
pub struct GatewaySetResolver;

impl GatewaySetResolver {
    /// Create new resolver
    pub fn new() -> Self {
        Self
    }

    /// Gateways of `entry` in registration order, without duplicates.
    /// An entry without gateways yields an empty list.
    pub fn resolve(&self, entry: &RegistryEntry) -> Vec<String> {
        dedup_gateways(&entry.gateways)
    }
}
