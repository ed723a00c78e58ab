//! Codec Module
//!
//! Default compression algorithm pair: zlib-wrapped deflate at the fastest
//! compression level, with a matching inflate. The output is wire-compatible
//! with any zlib level-1 deflate stream, so values written by other
//! processes sharing the same cache decompress cleanly.

use std::io;
use std::io::Write;

use flate2::write::{ZlibDecoder, ZlibEncoder};
use flate2::Compression;

// == Deflate ==
/// Compresses `data` with deflate at the fastest level (zlib framing).
pub fn deflate_fast(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
    encoder.write_all(data)?;
    encoder.finish()
}

// == Inflate ==
/// Decompresses a zlib-framed deflate stream.
///
/// Fails on corrupt or truncated input.
pub fn inflate(data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    decoder.write_all(data)?;
    decoder.finish()
}
