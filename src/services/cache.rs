use std::sync::Arc;
use std::time::Duration;

use crate::models::SupportResource;
use crate::services::store::{ResultsStore, StoreError};

const CATALOG_KEY: &str = "catalog";

/// In-process cache in front of the support catalog.
///
/// The catalog is static reference data, so every matching run can read it
/// from memory instead of the store until the TTL expires.
pub struct CatalogCache {
    cache: moka::future::Cache<&'static str, Arc<Vec<SupportResource>>>,
}

impl CatalogCache {
    pub fn new(ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(1)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Get the catalog, loading it from the store on a miss
    pub async fn get_or_load(&self, store: &dyn ResultsStore) -> Result<Arc<Vec<SupportResource>>, StoreError> {
        if let Some(catalog) = self.cache.get(CATALOG_KEY).await {
            tracing::trace!("Catalog cache hit");
            return Ok(catalog);
        }

        let catalog = Arc::new(store.all_resources().await?);
        tracing::debug!("Loaded {} support resources into cache", catalog.len());

        // An empty catalog is not cached so a later seed shows up immediately
        if !catalog.is_empty() {
            self.cache.insert(CATALOG_KEY, catalog.clone()).await;
        }
        Ok(catalog)
    }

    /// Drop the cached catalog
    pub async fn invalidate(&self) {
        self.cache.invalidate(CATALOG_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::default_catalog;
    use crate::services::memory::MemoryStore;

    #[tokio::test]
    async fn test_empty_catalog_not_cached() {
        let store = MemoryStore::new();
        let cache = CatalogCache::new(60);

        assert!(cache.get_or_load(&store).await.unwrap().is_empty());

        store.seed_resources(&default_catalog()).await.unwrap();
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_cached_catalog_served_until_invalidated() {
        let store = MemoryStore::new();
        let cache = CatalogCache::new(60);
        let catalog = default_catalog();

        store.seed_resources(&catalog[..2]).await.unwrap();
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 2);

        let other = MemoryStore::new();
        other.seed_resources(&catalog).await.unwrap();
        assert_eq!(cache.get_or_load(&other).await.unwrap().len(), 2);

        cache.invalidate().await;
        assert_eq!(cache.get_or_load(&other).await.unwrap().len(), 9);
    }
}
