use anyhow::{Context, Result};
use async_trait::async_trait;
use gateway_common::traits::KvStore;
use sled::Tree;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Tree holding source-chain hash -> destination-chain hash mappings
pub const DEFAULT_TREE: &str = "move_hash";

pub struct SledDB {
    db: Arc<Tree>,
}

impl SledDB {
    pub fn new<P: AsRef<Path>>(path: P, tree: &str) -> Result<Self> {
        info!("Opening sled store at {:?} (tree {})", path.as_ref(), tree);
        let db = sled::open(path).context("Failed to open Sled database")?;
        Self::from_db(db, tree)
    }

    /// Create a new SledDB instance from an existing sled::Db
    pub fn from_db(db: sled::Db, tree: &str) -> Result<Self> {
        let tree = db.open_tree(tree).context("Failed to open sled tree")?;
        Ok(Self {
            db: Arc::new(tree),
        })
    }

    /// In-memory instance, dropped with the value
    pub fn temporary(tree: &str) -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .context("Failed to open temporary Sled database")?;
        Self::from_db(db, tree)
    }
}

#[async_trait]
impl KvStore for SledDB {
    async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let db = self.db.clone();
        let key = key.to_vec();

        tokio::task::spawn_blocking(move || {
            match db.get(&key) {
                Ok(Some(value)) => Ok(Some(value.to_vec())),
                Ok(None) => Ok(None),
                Err(e) => Err(anyhow::anyhow!("Failed to get from SledDB: {}", e)),
            }
        }).await?
    }

    async fn insert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let db = self.db.clone();
        let key = key.to_vec();
        let value = value.to_vec();

        tokio::task::spawn_blocking(move || {
            db.insert(key.as_slice(), value.as_slice())
                .map(|_| ())
                .map_err(|e| anyhow::anyhow!("Failed to insert into SledDB: {}", e))
        }).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let db = SledDB::new(temp_dir.path(), DEFAULT_TREE).unwrap();

        db.insert(b"0xabc", b"0xdef").await.unwrap();
        let value = db.get(b"0xabc").await.unwrap();
        assert_eq!(value, Some(b"0xdef".to_vec()));

        let value = db.get(b"non_existent").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_trees_are_isolated() {
        let db = sled::Config::new().temporary(true).open().unwrap();
        let a = SledDB::from_db(db.clone(), "a").unwrap();
        let b = SledDB::from_db(db, "b").unwrap();

        a.insert(b"key", b"value").await.unwrap();
        assert_eq!(b.get(b"key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_temporary() {
        let db = SledDB::temporary(DEFAULT_TREE).unwrap();
        db.insert(b"k", b"v").await.unwrap();
        assert_eq!(db.get(b"k").await.unwrap(), Some(b"v".to_vec()));
    }
}
