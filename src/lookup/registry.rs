//! Per-share lookup ownership for the HTTP service
//!
//! Each share slug gets its own [`DocumentLookup`]. The registry is bounded
//! with LRU eviction so abandoned shares do not accumulate.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::time::Duration;

use super::cache::DocumentLookup;
use super::error::Result;
use super::source::{validate_slug, DocumentSource};

/// Registry configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Maximum number of shares with a live lookup
    pub max_shares: usize,
    /// Freshness window of each lookup
    pub ttl: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_shares: 64,
            ttl: super::cache::DEFAULT_TTL,
        }
    }
}

/// Owner of one [`DocumentLookup`] per share slug
#[derive(Clone)]
pub struct LookupRegistry {
    source: Arc<dyn DocumentSource>,
    lookups: Arc<Mutex<LruCache<String, Arc<DocumentLookup>>>>,
    config: RegistryConfig,
}

impl LookupRegistry {
    pub fn new(source: Arc<dyn DocumentSource>, config: RegistryConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_shares).unwrap_or(NonZeroUsize::MIN);

        Self {
            source,
            lookups: Arc::new(Mutex::new(LruCache::new(capacity))),
            config,
        }
    }

    /// Lookup for `slug`, created uninitialized on first use
    pub fn lookup(&self, slug: &str) -> Result<Arc<DocumentLookup>> {
        validate_slug(slug)?;

        let mut lookups = self.lookups.lock();
        if let Some(existing) = lookups.get(slug) {
            return Ok(Arc::clone(existing));
        }

        let lookup = Arc::new(DocumentLookup::with_ttl(
            Arc::clone(&self.source),
            self.config.ttl,
        ));
        if let Some((evicted, _)) = lookups.push(slug.to_string(), Arc::clone(&lookup)) {
            if evicted != slug {
                tracing::debug!("Evicted document lookup for share {}", evicted);
            }
        }
        Ok(lookup)
    }

    /// Lookup for `slug`, initialized (or refreshed when stale or forced)
    pub async fn initialized(&self, slug: &str, force: bool) -> Result<Arc<DocumentLookup>> {
        let lookup = self.lookup(slug)?;
        lookup.init(slug, force).await?;
        Ok(lookup)
    }

    /// Clear and drop the lookup for `slug`. Returns whether one existed.
    pub fn release(&self, slug: &str) -> bool {
        match self.lookups.lock().pop(slug) {
            Some(lookup) => {
                lookup.clear();
                true
            }
            None => false,
        }
    }

    /// Number of shares with a live lookup
    pub fn len(&self) -> usize {
        self.lookups.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::types::DocumentInfo;
    use async_trait::async_trait;

    struct EmptySource;

    #[async_trait]
    impl DocumentSource for EmptySource {
        async fn fetch_documents(&self, _slug: &str) -> Result<Vec<DocumentInfo>> {
            Ok(Vec::new())
        }
    }

    fn registry(max_shares: usize) -> LookupRegistry {
        LookupRegistry::new(
            Arc::new(EmptySource),
            RegistryConfig {
                max_shares,
                ..RegistryConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_same_slug_shares_lookup() {
        let registry = registry(4);
        let a = registry.lookup("share").unwrap();
        let b = registry.lookup("share").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let registry = registry(2);
        registry.lookup("a").unwrap();
        registry.lookup("b").unwrap();
        registry.lookup("c").unwrap();
        assert_eq!(registry.len(), 2);
        assert!(!registry.release("a"));
        assert!(registry.release("c"));
    }

    #[tokio::test]
    async fn test_release_clears_lookup() {
        let registry = registry(4);
        let lookup = registry.initialized("share", false).await.unwrap();
        assert!(lookup.is_initialized("share"));

        assert!(registry.release("share"));
        assert!(!lookup.is_initialized("share"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_slug_rejected() {
        let registry = registry(4);
        assert!(registry.lookup("../x").is_err());
        assert!(registry.is_empty());
    }
}
