//! Snapshot cache of the service definitions under the watched root.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::SystemTime;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// A service definition as stored in the registry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Service {
    /// Registry identifier, e.g. "/apps/billing".
    pub id: String,

    /// Routing rule for the fronting proxy (opaque to this process).
    #[serde(default)]
    pub routing_rule: String,
}

/// One materialized snapshot of the registry.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ServiceState {
    /// Services keyed by id, in stable order.
    pub services: BTreeMap<String, Service>,

    /// When this snapshot was taken.
    pub refreshed_at: Option<SystemTime>,
}

/// Lock-free, last-known-good view of the registry.
///
/// Written only by the refresher task; read by HTTP handlers on every
/// request. Swapping a snapshot never blocks readers.
#[derive(Clone, Default)]
pub struct StateCache {
    inner: Arc<ArcSwap<ServiceState>>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<ServiceState> {
        self.inner.load_full()
    }

    /// Replaces the snapshot.
    pub fn store(&self, state: ServiceState) {
        self.inner.store(Arc::new(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_starts_empty() {
        let cache = StateCache::new();
        let snapshot = cache.load();
        assert!(snapshot.services.is_empty());
        assert!(snapshot.refreshed_at.is_none());
    }

    #[test]
    fn swapped_snapshot_is_visible() {
        let cache = StateCache::new();
        let mut services = BTreeMap::new();
        services.insert(
            "/apps/a".to_string(),
            Service {
                id: "/apps/a".to_string(),
                routing_rule: "hdr(host) -i a.example.com".to_string(),
            },
        );
        cache.store(ServiceState {
            services,
            refreshed_at: Some(SystemTime::now()),
        });

        let snapshot = cache.load();
        assert_eq!(snapshot.services.len(), 1);
        assert!(snapshot.refreshed_at.is_some());
    }
}
