//! Compression Cache - A transparent compression layer for string caches
//!
//! Wraps any string-keyed, string-valued cache and compresses large values
//! before they are stored, restoring them transparently on read. Small values
//! pass through untouched.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CompressionCache, KeyValueCache, MemoryCache, SetOptions};
pub use config::CompressionConfig;
pub use error::{CacheError, Result};
