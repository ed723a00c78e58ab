//! Configuration Module
//!
//! Holds the compression settings captured when a wrapper is constructed:
//! the compress/decompress hook pair and the minimum size a value must exceed
//! before compression is attempted.

use std::fmt;
use std::io;
use std::sync::Arc;

use crate::cache::{codec, DEFAULT_MIN_COMPRESSION_SIZE};

// == Hook Types ==
/// Compression hook: raw value bytes in, compressed bytes out.
pub type CompressFn = Arc<dyn Fn(&[u8]) -> io::Result<Vec<u8>> + Send + Sync>;

/// Decompression hook: compressed bytes in, original value bytes out.
pub type DecompressFn = Arc<dyn Fn(&[u8]) -> io::Result<Vec<u8>> + Send + Sync>;

// == Compression Config ==
/// Immutable configuration for a [`CompressionCache`](crate::CompressionCache).
///
/// Defaults to deflate at the fastest compression level with a 256 KiB
/// threshold. Any subset can be overridden with the builder methods; unset
/// fields keep their defaults.
#[derive(Clone)]
pub struct CompressionConfig {
    /// Hook applied to values that cross the size threshold
    pub(crate) compress: CompressFn,
    /// Hook applied to stored values carrying the compression prefix
    pub(crate) decompress: DecompressFn,
    /// Values must be strictly larger than this (in bytes) to be compressed.
    /// `None` disables the size check entirely: every value is compressed,
    /// including empty strings.
    pub(crate) minimum_compression_size: Option<usize>,
}

impl CompressionConfig {
    /// Creates a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    // == Builder Methods ==
    /// Replaces the compression hook.
    ///
    /// The matching decompression hook must be set as well, or reads of
    /// values written with this hook will fail.
    pub fn with_compress(
        mut self,
        f: impl Fn(&[u8]) -> io::Result<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        self.compress = Arc::new(f);
        self
    }

    /// Replaces the decompression hook.
    pub fn with_decompress(
        mut self,
        f: impl Fn(&[u8]) -> io::Result<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        self.decompress = Arc::new(f);
        self
    }

    /// Sets the minimum size (in bytes) a value must exceed to be compressed.
    ///
    /// A value of exactly this length is stored uncompressed.
    pub fn with_minimum_compression_size(mut self, bytes: usize) -> Self {
        self.minimum_compression_size = Some(bytes);
        self
    }

    /// Disables the size check, forcing compression of every value.
    pub fn compress_all(mut self) -> Self {
        self.minimum_compression_size = None;
        self
    }
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            compress: Arc::new(codec::deflate_fast),
            decompress: Arc::new(codec::inflate),
            minimum_compression_size: Some(DEFAULT_MIN_COMPRESSION_SIZE),
        }
    }
}

// Manual impl because the hooks are opaque closures.
impl fmt::Debug for CompressionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionConfig")
            .field("minimum_compression_size", &self.minimum_compression_size)
            .finish_non_exhaustive()
    }
}
