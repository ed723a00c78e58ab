//! Compression Decorator Module
//!
//! The core of the crate: a [`KeyValueCache`] decorator that compresses
//! large values on write and restores them on read. Values at or below the
//! configured size threshold are stored as-is to avoid wasted CPU on small
//! payloads.
//!
//! Compressed values are framed as `"cmp:" + base64(deflate(utf8(value)))`;
//! the prefix is the only marker distinguishing compressed payloads from
//! plain ones, so values written by processes without this wrapper read back
//! unchanged.

use std::borrow::Cow;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::cache::{KeyValueCache, SetOptions, COMPRESSED_PREFIX};
use crate::config::CompressionConfig;
use crate::error::{CacheError, Result};

// == Compression Cache ==
/// Transparent compression wrapper around an underlying cache.
///
/// Holds no state beyond the configuration captured at construction; every
/// call stands alone, so a single instance is safe to share across tasks.
/// Consistency for concurrent writes to the same key is whatever the
/// underlying cache guarantees - this layer adds no synchronization.
#[derive(Debug)]
pub struct CompressionCache<C> {
    /// The decorated cache; its lifecycle is owned elsewhere
    inner: C,
    /// Compression hooks and size threshold
    config: CompressionConfig,
}

impl<C: KeyValueCache> CompressionCache<C> {
    // == Constructors ==
    /// Wraps `inner` with the default configuration: deflate at the fastest
    /// level, 256 KiB threshold.
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, CompressionConfig::default())
    }

    /// Wraps `inner` with an explicit configuration.
    pub fn with_config(inner: C, config: CompressionConfig) -> Self {
        debug!(?config, "creating compression wrapper");
        Self { inner, config }
    }

    /// Returns a reference to the decorated cache.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    // == Framing ==
    /// Compresses `value` and frames it with the compression prefix.
    fn frame(&self, key: &str, value: &str) -> Result<String> {
        let uncompressed_size = value.len();
        debug!(key, size = uncompressed_size, "compression start");

        let compressed = match (self.config.compress)(value.as_bytes()) {
            Ok(bytes) => bytes,
            Err(err) => {
                // Size telemetry is emitted even when compression fails.
                debug!(key, from = uncompressed_size, "compression failed");
                return Err(CacheError::Compression(err.to_string()));
            }
        };

        let framed = format!("{COMPRESSED_PREFIX}{}", STANDARD.encode(&compressed));
        debug!(
            key,
            from = uncompressed_size,
            to = framed.len(),
            "compression ended"
        );
        Ok(framed)
    }

    /// Strips the prefix and restores the original value.
    fn unframe(&self, key: &str, encoded: &str) -> Result<String> {
        debug!(key, "decompression start");

        let compressed = STANDARD
            .decode(encoded)
            .map_err(|err| CacheError::Decompression(format!("invalid base64 payload: {err}")))?;

        let bytes = (self.config.decompress)(&compressed)
            .map_err(|err| CacheError::Decompression(err.to_string()))?;

        let value = String::from_utf8(bytes).map_err(|err| {
            CacheError::Decompression(format!("decompressed payload is not valid UTF-8: {err}"))
        })?;

        debug!(key, "decompression ended");
        Ok(value)
    }
}

// == KeyValueCache Implementation ==
#[async_trait]
impl<C: KeyValueCache> KeyValueCache for CompressionCache<C> {
    /// Retrieves a value, decompressing it if it carries the prefix.
    ///
    /// A true miss returns `Ok(None)` without touching the decompression
    /// path. A prefixed value that cannot be restored surfaces as
    /// [`CacheError::Decompression`] rather than a miss.
    async fn get(&self, key: &str) -> Result<Option<String>> {
        debug!(key, "getting data from cache");

        let Some(stored) = self.inner.get(key).await? else {
            debug!(key, "no data found");
            return Ok(None);
        };

        let Some(encoded) = stored.strip_prefix(COMPRESSED_PREFIX) else {
            debug!(key, "data not compressed");
            return Ok(Some(stored));
        };

        self.unframe(key, encoded).map(Some)
    }

    /// Stores a value, compressing it first when the size check passes.
    ///
    /// The value is compressed when the threshold is disabled or when its
    /// byte length strictly exceeds the threshold; a value of exactly the
    /// threshold length stays plain. Once the threshold is crossed the
    /// framed form is stored unconditionally, even if it came out larger
    /// than the original.
    async fn set(&self, key: &str, value: &str, options: SetOptions) -> Result<()> {
        debug!(key, "storing data in cache");

        let must_compress = match self.config.minimum_compression_size {
            None => true,
            Some(min) => value.len() > min,
        };

        let stored: Cow<'_, str> = if must_compress {
            Cow::Owned(self.frame(key, value)?)
        } else {
            debug!(key, "no data compression needed");
            Cow::Borrowed(value)
        };

        self.inner.set(key, &stored, options).await?;
        debug!(key, "data stored in cache");
        Ok(())
    }

    /// Pure passthrough; deletion never inspects value content.
    async fn delete(&self, key: &str) -> Result<bool> {
        debug!(key, "removing data from cache");
        self.inner.delete(key).await
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::cache::{codec, MemoryCache};

    fn wrapped(config: CompressionConfig) -> (Arc<MemoryCache>, CompressionCache<Arc<MemoryCache>>) {
        let backend = Arc::new(MemoryCache::new());
        let cache = CompressionCache::with_config(Arc::clone(&backend), config);
        (backend, cache)
    }

    #[tokio::test]
    async fn test_basic_get_and_set() {
        let cache = CompressionCache::new(MemoryCache::new());

        cache.set("hello", "world", SetOptions::default()).await.unwrap();

        assert_eq!(cache.get("hello").await.unwrap().as_deref(), Some("world"));
        assert_eq!(cache.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_and_delete() {
        let cache = CompressionCache::new(MemoryCache::new());

        cache.set("hello2", "world", SetOptions::default()).await.unwrap();
        assert_eq!(cache.get("hello2").await.unwrap().as_deref(), Some("world"));

        assert!(cache.delete("hello2").await.unwrap());
        assert_eq!(cache.get("hello2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_value_at_threshold_stays_plain() {
        let (backend, cache) =
            wrapped(CompressionConfig::new().with_minimum_compression_size(11));

        // 10 bytes, below the 11-byte threshold.
        cache.set("test-key", "test value", SetOptions::default()).await.unwrap();
        assert_eq!(
            backend.get("test-key").await.unwrap().as_deref(),
            Some("test value")
        );

        // Exactly 11 bytes is still not compressed; the value must strictly
        // exceed the threshold.
        cache.set("edge-key", "elevenbytes", SetOptions::default()).await.unwrap();
        assert_eq!(
            backend.get("edge-key").await.unwrap().as_deref(),
            Some("elevenbytes")
        );
    }

    #[tokio::test]
    async fn test_value_over_threshold_is_framed() {
        let (backend, cache) =
            wrapped(CompressionConfig::new().with_minimum_compression_size(11));

        cache
            .set("test-key", "one big test value", SetOptions::default())
            .await
            .unwrap();

        let stored = backend.get("test-key").await.unwrap().unwrap();
        assert!(stored.starts_with(COMPRESSED_PREFIX));

        // And it round-trips through the wrapper.
        assert_eq!(
            cache.get("test-key").await.unwrap().as_deref(),
            Some("one big test value")
        );
    }

    #[tokio::test]
    async fn test_default_threshold_compresses_large_value() {
        let (backend, cache) = wrapped(CompressionConfig::default());

        let value = "a".repeat(262_145);
        cache.set("test-key", &value, SetOptions::default()).await.unwrap();

        let stored = backend.get("test-key").await.unwrap().unwrap();
        assert!(stored.starts_with(COMPRESSED_PREFIX));
        assert!(stored.len() < value.len());

        assert_eq!(cache.get("test-key").await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_compress_all_includes_empty_string() {
        let (backend, cache) = wrapped(CompressionConfig::new().compress_all());

        cache.set("empty", "", SetOptions::default()).await.unwrap();

        let stored = backend.get("empty").await.unwrap().unwrap();
        assert!(stored.starts_with(COMPRESSED_PREFIX));

        assert_eq!(cache.get("empty").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_foreign_plain_value_passes_through() {
        let (backend, cache) =
            wrapped(CompressionConfig::new().with_minimum_compression_size(11));

        // Written by a process without the wrapper.
        backend.set("test-key", "test value", SetOptions::default()).await.unwrap();

        assert_eq!(
            cache.get("test-key").await.unwrap().as_deref(),
            Some("test value")
        );
    }

    #[tokio::test]
    async fn test_foreign_compressed_value_is_restored() {
        let (backend, cache) =
            wrapped(CompressionConfig::new().with_minimum_compression_size(11));

        // zlib level-1 deflate of "one big test value", written by another
        // process sharing the cache format.
        backend
            .set(
                "test-key",
                "cmp:eAHLz0tVSMpMVyhJLS5RKEvMKU0FAD5BBrI=",
                SetOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(
            cache.get("test-key").await.unwrap().as_deref(),
            Some("one big test value")
        );
    }

    #[tokio::test]
    async fn test_corrupt_payload_surfaces_as_error() {
        let (backend, cache) = wrapped(CompressionConfig::default());

        backend
            .set("bad-b64", "cmp:!!!not-base64!!!", SetOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            cache.get("bad-b64").await,
            Err(CacheError::Decompression(_))
        ));

        // Valid base64 that is not a deflate stream.
        backend
            .set("bad-deflate", "cmp:bm90IGRlZmxhdGU=", SetOptions::default())
            .await
            .unwrap();
        assert!(matches!(
            cache.get("bad-deflate").await,
            Err(CacheError::Decompression(_))
        ));
    }

    #[tokio::test]
    async fn test_miss_never_invokes_decompression() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);

        let config = CompressionConfig::new().with_decompress(move |data| {
            counted.fetch_add(1, Ordering::SeqCst);
            codec::inflate(data)
        });
        let cache = CompressionCache::with_config(MemoryCache::new(), config);

        assert_eq!(cache.get("never-written").await.unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_compression_failure_aborts_write() {
        let config = CompressionConfig::new()
            .compress_all()
            .with_compress(|_| Err(io::Error::new(io::ErrorKind::Other, "codec exploded")));
        let (backend, cache) = {
            let backend = Arc::new(MemoryCache::new());
            let cache = CompressionCache::with_config(Arc::clone(&backend), config);
            (backend, cache)
        };

        let result = cache.set("key", "value", SetOptions::default()).await;
        assert!(matches!(result, Err(CacheError::Compression(_))));

        // The write never reached the underlying cache.
        assert_eq!(backend.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_backend_failure_propagates_unchanged() {
        struct FailingCache;

        #[async_trait]
        impl KeyValueCache for FailingCache {
            async fn get(&self, _key: &str) -> Result<Option<String>> {
                Err(CacheError::Backend("connection refused".to_string()))
            }

            async fn set(&self, _key: &str, _value: &str, _options: SetOptions) -> Result<()> {
                Err(CacheError::Backend("connection refused".to_string()))
            }

            async fn delete(&self, _key: &str) -> Result<bool> {
                Err(CacheError::Backend("connection refused".to_string()))
            }
        }

        let cache = CompressionCache::new(FailingCache);

        assert!(matches!(
            cache.get("key").await,
            Err(CacheError::Backend(_))
        ));
        assert!(matches!(
            cache.set("key", "value", SetOptions::default()).await,
            Err(CacheError::Backend(_))
        ));
        assert!(matches!(
            cache.delete("key").await,
            Err(CacheError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_wrappers_compose() {
        // A wrapper is itself a KeyValueCache, so it can be decorated again.
        let inner = CompressionCache::with_config(
            MemoryCache::new(),
            CompressionConfig::new().with_minimum_compression_size(16),
        );
        let outer = CompressionCache::new(inner);

        outer.set("key", "some value", SetOptions::default()).await.unwrap();
        assert_eq!(outer.get("key").await.unwrap().as_deref(), Some("some value"));
    }
}
