//! In-process implementation of [`KeyValueStore`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, KeyValueStore};
use crate::error::Result;

// == Memory Store ==
/// Shared handle to a [`CacheStore`] behind an async `RwLock`.
///
/// Clones point at the same underlying store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<CacheStore>>,
}

impl MemoryStore {
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    pub fn from_store(store: CacheStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        // Write lock: reads update LRU order and stats
        Ok(self.inner.write().await.get(key))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.inner.write().await.set(key.to_string(), value, ttl)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.inner.write().await.delete(key))
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<usize> {
        Ok(self.inner.write().await.invalidate_pattern(pattern))
    }
}
