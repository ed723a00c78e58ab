//! Error types for the compression cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the compression cache layer.
///
/// A missing key is not an error; `get` reports it as `Ok(None)`. Errors are
/// reserved for real failures: the underlying cache refusing an operation, or
/// the compression codec rejecting a payload.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The underlying cache failed; propagated unchanged, never retried
    #[error("backend error: {0}")]
    Backend(String),

    /// Compression failed during a write; the write does not proceed
    #[error("compression failed: {0}")]
    Compression(String),

    /// A stored value carried the compression prefix but could not be
    /// restored (corrupt base64, truncated deflate stream, or invalid UTF-8).
    /// Never masked as a cache miss, since that would hide data corruption.
    #[error("decompression failed: {0}")]
    Decompression(String),
}

// == Result Type Alias ==
/// Convenience Result type for the compression cache.
pub type Result<T> = std::result::Result<T, CacheError>;
