//! Byte-level compression of `f32` arrays, with and without mantissa truncation.
//!
//! The [`Compressor`] trait is what the benchmark harness drives.
//! [`ZlibCompressor`] is lossless; [`TruncatingCompressor`] truncates the data first and is
//! therefore lossy end-to-end, but its output decompresses to *exactly* the truncated array.
//!
//! # Example
//! ```rust
//! use mantissa_trunc::compressor::{Compressor, TruncatingCompressor};
//! use mantissa_trunc::truncation::truncate_array;
//!
//! let data: Vec<f32> = (0..1000).map(|i| (i as f32).sin()).collect();
//! let c = TruncatingCompressor::zlib(13, 9, true).unwrap();
//!
//! let compressed = c.compress(&data).unwrap();
//! let decompressed = c.decompress(&compressed, data.len()).unwrap();
//! assert_eq!(decompressed, truncate_array(&data, 13, true).unwrap());
//! ```

use std::io::{Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use tracing::debug;

use crate::precision::bits_for_precision;
use crate::truncation::Truncation;
use crate::{Result, TruncError};

/// Size of a single serialized element.
pub const FLOAT_BYTES: usize = std::mem::size_of::<f32>();

/// Something that turns floats into bytes and back.
pub trait Compressor {
    /// short human readable description, used in reports
    fn name(&self) -> String;

    /// compress `data` into an opaque byte buffer
    fn compress(&self, data: &[f32]) -> Result<Vec<u8>>;

    /// inverse of [`Compressor::compress`]. The stream doesn't record its length, so the
    /// caller has to say how many elements to expect.
    fn decompress(&self, compressed: &[u8], n_elements: usize) -> Result<Vec<f32>>;
}

/// Floats as little endian bytes.
pub fn floats_to_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|x| x.to_le_bytes()).collect()
}

/// Inverse of [`floats_to_bytes`]. Fails if `bytes` isn't a whole number of floats.
pub fn bytes_to_floats(bytes: &[u8]) -> Result<Vec<f32>> {
    if bytes.len() % FLOAT_BYTES != 0 {
        return Err(TruncError::LengthMismatch {
            expected: bytes.len().next_multiple_of(FLOAT_BYTES),
            actual: bytes.len(),
        });
    }
    Ok(bytes
        .chunks_exact(FLOAT_BYTES)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Plain zlib (deflate) over the little endian bytes of the input.
#[derive(Debug, Clone, Copy)]
pub struct ZlibCompressor {
    level: u32,
}

impl ZlibCompressor {
    /// `level` in `[0, 9]`: 0 stores, 9 compresses hardest.
    pub fn new(level: i32) -> Result<Self> {
        TruncError::check_range("compression_level", level.into(), 0, 9)?;
        Ok(ZlibCompressor { level: level as u32 })
    }

    /// the zlib compression level
    pub fn level(&self) -> u32 {
        self.level
    }
}

impl Compressor for ZlibCompressor {
    fn name(&self) -> String {
        format!("zlib(level={})", self.level)
    }

    fn compress(&self, data: &[f32]) -> Result<Vec<u8>> {
        let raw = floats_to_bytes(data);
        let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::new(self.level));
        encoder.write_all(&raw)?;
        let compressed = encoder.finish()?;
        debug!(level = self.level, raw_bytes = raw.len(), compressed_bytes = compressed.len(), "zlib compress");
        Ok(compressed)
    }

    fn decompress(&self, compressed: &[u8], n_elements: usize) -> Result<Vec<f32>> {
        let expected = n_elements.checked_mul(FLOAT_BYTES).ok_or(TruncError::InvalidArgument {
            name: "n_elements",
            value: i64::try_from(n_elements).unwrap_or(i64::MAX),
            min: 0,
            max: (usize::MAX / FLOAT_BYTES) as i64,
        })?;
        // one byte past `expected` is enough to tell the stream is too long
        let mut raw = Vec::new();
        ZlibDecoder::new(compressed)
            .take(expected as u64 + 1)
            .read_to_end(&mut raw)?;
        if raw.len() != expected {
            return Err(TruncError::LengthMismatch { expected, actual: raw.len() });
        }
        bytes_to_floats(&raw)
    }
}

/// Truncates mantissa bits, then hands the result to an inner [`Compressor`].
#[derive(Debug, Clone, Copy)]
pub struct TruncatingCompressor<C> {
    truncation: Truncation,
    inner: C,
}

impl<C: Compressor> TruncatingCompressor<C> {
    /// wrap `inner`, truncating with `truncation` before every compression
    pub fn new(truncation: Truncation, inner: C) -> Self {
        TruncatingCompressor { truncation, inner }
    }

    /// the truncation applied before compressing
    pub fn truncation(&self) -> Truncation {
        self.truncation
    }

    /// the wrapped compressor
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl TruncatingCompressor<ZlibCompressor> {
    /// Drop `bits` mantissa bits, then zlib at `level`.
    pub fn zlib(bits: i32, level: i32, round: bool) -> Result<Self> {
        Ok(Self::new(Truncation::new(bits, round)?, ZlibCompressor::new(level)?))
    }

    /// Keep `digits` decimal digits (see [`bits_for_precision`]), rounding, then zlib at `level`.
    pub fn zlib_with_precision(digits: i32, level: i32) -> Result<Self> {
        let bits = bits_for_precision(digits)?;
        debug!(digits, bits, "precision to truncation bits");
        Self::zlib(bits as i32, level, true)
    }
}

impl<C: Compressor> Compressor for TruncatingCompressor<C> {
    fn name(&self) -> String {
        format!(
            "truncate(bits={}, rounding={:?}) + {}",
            self.truncation.bits(),
            self.truncation.rounding(),
            self.inner.name()
        )
    }

    fn compress(&self, data: &[f32]) -> Result<Vec<u8>> {
        if self.truncation.bits() == 0 {
            return self.inner.compress(data);
        }
        let truncated = self.truncation.apply_slice(data);
        self.inner.compress(&truncated)
    }

    fn decompress(&self, compressed: &[u8], n_elements: usize) -> Result<Vec<f32>> {
        // truncation is not reversible, the inner stream already holds the truncated values
        self.inner.decompress(compressed, n_elements)
    }
}
