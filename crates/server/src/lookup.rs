//! Source-chain hash -> destination-chain hash lookup

use gateway_common::traits::KvStore;
use gateway_common::{GatewayError, GatewayResult};
use moka::future::Cache;
use std::sync::Arc;
use tracing::{debug, error};

/// Probed when the caller gives no hash
pub const DEFAULT_PROBE_HASH: &str = "0x1";

/// Returned when no mapping exists yet
pub const MISSING_MAPPING: &str = "";

const CACHE_CAPACITY: u64 = 100_000;

pub struct HashLookupController {
    store: Arc<dyn KvStore>,
    // Mappings are write-once, so hits never go stale. Misses are not cached.
    cache: Cache<String, String>,
}

impl HashLookupController {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            cache: Cache::new(CACHE_CAPACITY),
        }
    }

    pub async fn lookup(&self, hash: Option<&str>) -> GatewayResult<String> {
        let key = hash
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_lowercase)
            .unwrap_or_else(|| DEFAULT_PROBE_HASH.to_string());

        if let Some(mapped) = self.cache.get(&key).await {
            return Ok(mapped);
        }

        match self.store.get(key.as_bytes()).await {
            Ok(Some(bytes)) => {
                let mapped = String::from_utf8(bytes).map_err(|_| {
                    GatewayError::DependencyFailure(format!("Mapping for {} is not UTF-8", key))
                })?;
                self.cache.insert(key, mapped.clone()).await;
                Ok(mapped)
            }
            Ok(None) => {
                debug!("No mapping for {}", key);
                Ok(MISSING_MAPPING.to_string())
            }
            Err(e) => {
                error!("Hash lookup for {} failed: {}", key, e);
                Err(GatewayError::DependencyFailure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gateway_storage::SledDB;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        inner: SledDB,
        reads: AtomicUsize,
    }

    #[async_trait]
    impl KvStore for CountingStore {
        async fn get(&self, key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key).await
        }

        async fn insert(&self, key: &[u8], value: &[u8]) -> anyhow::Result<()> {
            self.inner.insert(key, value).await
        }
    }

    struct DownStore;

    #[async_trait]
    impl KvStore for DownStore {
        async fn get(&self, _key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
            anyhow::bail!("connection refused")
        }

        async fn insert(&self, _key: &[u8], _value: &[u8]) -> anyhow::Result<()> {
            anyhow::bail!("connection refused")
        }
    }

    async fn seeded() -> Arc<CountingStore> {
        let store = Arc::new(CountingStore {
            inner: SledDB::temporary("move_hash").unwrap(),
            reads: AtomicUsize::new(0),
        });
        store.insert(b"0xabcdef", b"0x0123").await.unwrap();
        store.insert(b"0x1", b"0xprobe").await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_unseen_hash_returns_sentinel() {
        let controller = HashLookupController::new(seeded().await);
        assert_eq!(controller.lookup(Some("0xfff")).await.unwrap(), MISSING_MAPPING);
    }

    #[tokio::test]
    async fn test_hash_is_lowercased() {
        let controller = HashLookupController::new(seeded().await);
        assert_eq!(controller.lookup(Some("0xABCDEF")).await.unwrap(), "0x0123");
    }

    #[tokio::test]
    async fn test_absent_hash_uses_probe() {
        let controller = HashLookupController::new(seeded().await);
        assert_eq!(controller.lookup(None).await.unwrap(), "0xprobe");
        assert_eq!(controller.lookup(Some("")).await.unwrap(), "0xprobe");
    }

    #[tokio::test]
    async fn test_hits_are_cached_misses_are_not() {
        let store = seeded().await;
        let controller = HashLookupController::new(store.clone());

        controller.lookup(Some("0xabcdef")).await.unwrap();
        controller.lookup(Some("0xabcdef")).await.unwrap();
        assert_eq!(store.reads.load(Ordering::SeqCst), 1);

        controller.lookup(Some("0x99")).await.unwrap();
        store.insert(b"0x99", b"0x98").await.unwrap();
        assert_eq!(controller.lookup(Some("0x99")).await.unwrap(), "0x98");
    }

    #[tokio::test]
    async fn test_store_down_is_dependency_failure() {
        let controller = HashLookupController::new(Arc::new(DownStore));
        assert!(matches!(
            controller.lookup(Some("0x1")).await,
            Err(GatewayError::DependencyFailure(_))
        ));
    }
}
