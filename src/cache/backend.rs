//! Backend Contract Module
//!
//! Defines the async contract any underlying cache must satisfy to be
//! wrapped by the compression layer. The underlying cache owns storage,
//! eviction, and TTL enforcement; this crate only decorates it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// == Set Options ==
/// Per-entry options forwarded verbatim to the underlying cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    /// Seconds until the entry expires. `None` means the entry never expires.
    pub ttl: Option<u64>,
}

impl SetOptions {
    /// Options expiring the entry after `seconds`.
    pub fn ttl(seconds: u64) -> Self {
        Self { ttl: Some(seconds) }
    }
}

// == Key-Value Cache Trait ==
/// Async contract for a string-keyed, string-valued cache.
///
/// Implemented both by underlying backends (e.g. [`MemoryCache`]) and by
/// [`CompressionCache`] itself, so wrappers compose like any other backend.
///
/// [`MemoryCache`]: crate::MemoryCache
/// [`CompressionCache`]: crate::CompressionCache
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    /// Retrieves a value by key. `Ok(None)` means a true cache miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores a key-value pair. Overwrites any existing entry for the key.
    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<()>;

    /// Removes an entry by key. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}

// A backend shared behind an Arc is still a backend; lets the same
// underlying cache be handed to the wrapper and to other callers.
#[async_trait]
impl<T> KeyValueCache for Arc<T>
where
    T: KeyValueCache + ?Sized,
{
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<()> {
        (**self).set(key, value, options).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        (**self).delete(key).await
    }
}
