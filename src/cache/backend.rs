//! Key-value store boundary used by the cached fetcher.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A key-value store with per-entry expiry.
///
/// Implementations may be in-process or networked. Reads of absent or
/// expired keys return `Ok(None)`; an `Err` means the store itself failed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Overwrites unconditionally and restarts the expiry window.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;

    /// Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Removes every key matching a `*`/`?` glob, returning how many went.
    async fn invalidate_pattern(&self, pattern: &str) -> Result<usize>;
}
