//! In-Memory Backend Module
//!
//! A simple HashMap-backed [`KeyValueCache`] with TTL expiry. Useful as a
//! test double and for embedders that do not need a networked cache; a
//! production deployment would typically wrap a remote store instead.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, KeyValueCache, SetOptions};
use crate::error::Result;

// == Memory Cache ==
/// In-memory key-value store with per-entry TTL.
///
/// Expired entries become invisible immediately and are reclaimed lazily on
/// the next read of their key, or in bulk via [`cleanup_expired`].
///
/// [`cleanup_expired`]: MemoryCache::cleanup_expired
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries currently held, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub async fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let removed = before - entries.len();

        if removed > 0 {
            debug!(removed, "cleaned up expired entries");
        }
        removed
    }
}

// == KeyValueCache Implementation ==
#[async_trait]
impl KeyValueCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // The entry expired: reclaim its slot before reporting the miss.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.is_expired()) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<()> {
        let entry = CacheEntry::new(value.to_string(), options.ttl);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired()))
    }
}
