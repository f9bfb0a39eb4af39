//! Enrichment cache — a process-lifetime, write-once memo of provider
//! responses.
//!
//! Keyed by `(input, kind)`, where the input is an address for the
//! address-intelligence provider and a free-text context for the
//! classifier. Only successful responses are stored; provider errors stay
//! uncached so the next lookup retries. Entries never expire and are never
//! overwritten (first success wins). There is no single-flight guard:
//! concurrent misses on the same key may both call upstream, and the first
//! insert sticks.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Which provider a cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentKind {
    AddressIntel,
    Classification,
}

/// Concurrency-safe write-once map of enrichment results.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentCache {
    inner: Arc<RwLock<HashMap<(String, EnrichmentKind), serde_json::Value>>>,
}

impl EnrichmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously stored result for this key and provider.
    pub async fn get(&self, key: &str, kind: EnrichmentKind) -> Option<serde_json::Value> {
        self.inner
            .read()
            .await
            .get(&(key.to_string(), kind))
            .cloned()
    }

    /// Store a result unless one is already present for this key and
    /// provider. Existing entries are never replaced.
    pub async fn put(&self, key: &str, kind: EnrichmentKind, value: serde_json::Value) {
        self.inner
            .write()
            .await
            .entry((key.to_string(), kind))
            .or_insert(value);
    }

    /// Number of stored entries across both providers.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
