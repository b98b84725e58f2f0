//! Gzip compression of envelope plaintext.
//!
//! Compressed output is never compared byte-for-byte (header fields may
//! differ between runs); only round trips are meaningful.

use crate::error::{CryptoError, CryptoResult};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compression level used when none is configured.
pub const DEFAULT_LEVEL: u32 = 6;

/// Smallest possible gzip member: 10-byte header plus 8-byte trailer.
const MIN_GZIP_LEN: usize = 18;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compresses `data` into a single gzip member at the default level.
pub fn compress(data: &[u8]) -> CryptoResult<Vec<u8>> {
    compress_with_level(data, DEFAULT_LEVEL)
}

/// Compresses `data` into a single gzip member at `level` (0-9).
pub fn compress_with_level(data: &[u8], level: u32) -> CryptoResult<Vec<u8>> {
    if level > 9 {
        return Err(CryptoError::InvalidArgument(format!(
            "compression level must be 0-9, got {level}"
        )));
    }

    let capacity = data.len() / 2 + 32;
    let mut encoder = GzEncoder::new(Vec::with_capacity(capacity), Compression::new(level));
    encoder
        .write_all(data)
        .and_then(|()| encoder.finish())
        .map_err(|e| CryptoError::CompressionFailed(e.to_string()))
}

/// Decompresses a gzip stream, draining every member to its trailer.
///
/// Concatenated members are decoded in order and their output joined.
/// Input that is not gzip, is truncated, fails a CRC check, or has bytes
/// after the last member that do not form another member is rejected with
/// `InvalidCompressedData`; partial output is never returned.
pub fn decompress(data: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut rest = data;
    loop {
        if rest.len() < MIN_GZIP_LEN || rest[..2] != GZIP_MAGIC {
            let what = if rest.len() == data.len() {
                "input is not a gzip stream"
            } else {
                "trailing bytes after gzip member"
            };
            return Err(CryptoError::InvalidCompressedData(what.to_string()));
        }

        let mut decoder = GzDecoder::new(rest);
        decoder
            .read_to_end(&mut out)
            .map_err(|e| CryptoError::InvalidCompressedData(e.to_string()))?;
        rest = decoder.into_inner();

        if rest.is_empty() {
            return Ok(out);
        }
    }
}
