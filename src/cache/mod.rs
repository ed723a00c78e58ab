//! Cache Module
//!
//! Provides the compression decorator, the backend contract it wraps, and an
//! in-memory backend with TTL expiry.

mod backend;
pub mod codec;
mod compression;
mod entry;
mod memory;


// Re-export public types
pub use backend::{KeyValueCache, SetOptions};
pub use compression::CompressionCache;
pub use entry::CacheEntry;
pub use memory::MemoryCache;

// == Public Constants ==
/// Marker prepended to compressed values in the underlying cache.
///
/// This prefix is the wire format shared with other readers and writers of
/// the same cache; changing it breaks cross-reader compatibility. A plain
/// value that happens to start with this prefix will be misread as
/// compressed - a known limitation of the framing.
pub const COMPRESSED_PREFIX: &str = "cmp:";

/// Default minimum value size in bytes before compression kicks in (256 KiB)
pub const DEFAULT_MIN_COMPRESSION_SIZE: usize = 262_144;
