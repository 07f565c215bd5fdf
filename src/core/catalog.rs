//! Cache-or-fetch loading of the currency catalog

use crate::core::cache::KeyValueCollection;
use crate::core::currency::{Catalog, CurrencyListProvider};
use crate::core::error::FetchError;
use std::sync::Arc;
use tracing::{debug, warn};

pub const CATALOG_COLLECTION: &str = "catalog";
pub const CATALOG_KEY: &[u8] = b"currencies";

pub struct CatalogLoader {
    source: Arc<dyn CurrencyListProvider>,
    cache: Arc<dyn KeyValueCollection>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CurrencyListProvider>, cache: Arc<dyn KeyValueCollection>) -> Self {
        Self { source, cache }
    }

    /// Returns the cached catalog when there is one, otherwise fetches it
    /// and stores it for later sessions. The cached copy never expires.
    pub async fn load_catalog(&self) -> Result<Catalog, FetchError> {
        if let Some(bytes) = self.cache.get(CATALOG_KEY).await {
            match serde_json::from_slice::<Catalog>(&bytes) {
                Ok(catalog) => {
                    debug!("Loaded {} currencies from local cache", catalog.len());
                    return Ok(catalog);
                }
                Err(e) => warn!("Ignoring unreadable cached catalog: {}", e),
            }
        }

        let catalog = self.source.fetch_currencies().await?;
        match serde_json::to_vec(&catalog) {
            Ok(bytes) => self.cache.put(CATALOG_KEY, &bytes).await,
            Err(e) => debug!("Failed to serialize catalog for caching: {}", e),
        }
        debug!("Fetched {} currencies", catalog.len());
        Ok(catalog)
    }

    /// Drops the cached catalog so the next load goes to the network.
    pub async fn clear_cache(&self) {
        self.cache.remove(CATALOG_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::Currency;
    use crate::store::memory::MemoryCollection;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockListProvider {
        call_count: AtomicUsize,
        fail: bool,
    }

    impl MockListProvider {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                call_count: AtomicUsize::new(0),
                fail,
            })
        }
    }

    #[async_trait]
    impl CurrencyListProvider for MockListProvider {
        async fn fetch_currencies(&self) -> Result<Catalog, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Status {
                    url: "/currencies".to_string(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            Ok([
                Currency::new("USD", "US Dollar"),
                Currency::new("EUR", "Euro"),
            ]
            .into_iter()
            .collect())
        }
    }

    #[tokio::test]
    async fn test_second_load_uses_cache() {
        let source = MockListProvider::new(false);
        let cache = Arc::new(MemoryCollection::new());
        let loader = CatalogLoader::new(source.clone(), cache.clone());

        let first = loader.load_catalog().await.unwrap();
        let second = loader.load_catalog().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.call_count.load(Ordering::SeqCst), 1);
        assert!(cache.get(CATALOG_KEY).await.is_some());
    }

    #[tokio::test]
    async fn test_disk_cache_idempotence() {
        use crate::core::cache::Store;
        use crate::store::KeyValueStore;

        let dir = tempfile::tempdir().unwrap();
        let store = KeyValueStore::open(dir.path());
        let cache = store
            .get_collection(CATALOG_COLLECTION, true, true)
            .unwrap();
        let source = MockListProvider::new(false);
        let loader = CatalogLoader::new(source.clone(), cache);

        for _ in 0..3 {
            let catalog = loader.load_catalog().await.unwrap();
            assert_eq!(catalog.codes(), vec!["EUR", "USD"]);
        }
        assert_eq!(source.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_prefilled_cache_skips_fetch() {
        let source = MockListProvider::new(true);
        let cache = Arc::new(MemoryCollection::new());
        cache
            .put(
                CATALOG_KEY,
                br#"{"USD":{"id":"USD","currencyName":"US Dollar"},"EUR":{"id":"EUR","currencyName":"Euro"}}"#,
            )
            .await;
        let loader = CatalogLoader::new(source.clone(), cache);

        let catalog = loader.load_catalog().await.unwrap();

        assert_eq!(catalog.codes(), vec!["EUR", "USD"]);
        assert_eq!(source.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_refetched() {
        let source = MockListProvider::new(false);
        let cache = Arc::new(MemoryCollection::new());
        cache.put(CATALOG_KEY, b"not json").await;
        let loader = CatalogLoader::new(source.clone(), cache);

        let catalog = loader.load_catalog().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(source.call_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_is_returned_and_not_cached() {
        let source = MockListProvider::new(true);
        let cache = Arc::new(MemoryCollection::new());
        let loader = CatalogLoader::new(source, cache.clone());

        assert!(loader.load_catalog().await.is_err());
        assert!(cache.get(CATALOG_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_cache_forces_refetch() {
        let source = MockListProvider::new(false);
        let cache = Arc::new(MemoryCollection::new());
        let loader = CatalogLoader::new(source.clone(), cache);

        loader.load_catalog().await.unwrap();
        loader.clear_cache().await;
        loader.load_catalog().await.unwrap();

        assert_eq!(source.call_count.load(Ordering::SeqCst), 2);
    }
}
