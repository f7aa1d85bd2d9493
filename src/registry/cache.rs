//! In-memory package metadata cache with a time-to-live

use crate::domain::PackageMetadata;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default entry lifetime (5 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_millis(300_000);

/// Maximum number of cached packages before expired entries are purged
const MAX_CACHE_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
struct CacheEntry {
    metadata: Arc<PackageMetadata>,
    stored_at: Instant,
}

/// Package metadata cache keyed by package name
#[derive(Debug)]
pub struct MetadataCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl MetadataCache {
    /// Create a cache whose entries live for `ttl`; a zero TTL disables caching
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh metadata for `package`, if cached
    pub async fn get(&self, package: &str) -> Option<Arc<PackageMetadata>> {
        let entries = self.entries.read().await;
        entries
            .get(package)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.metadata))
    }

    /// Store metadata for `package`
    pub async fn insert(&self, package: &str, metadata: Arc<PackageMetadata>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        if entries.len() >= MAX_CACHE_ENTRIES {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        }
        entries.insert(
            package.to_string(),
            CacheEntry {
                metadata,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, fresh or not
    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL)
    }
}
