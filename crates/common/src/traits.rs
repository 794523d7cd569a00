use anyhow::Result;
use async_trait::async_trait;

/// Key-value lookup service backing the hash mapping endpoint.
///
/// The gateway only ever reads through `get`; `insert` is there for the
/// indexer that populates the store.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    async fn insert(&self, key: &[u8], value: &[u8]) -> Result<()>;
}
