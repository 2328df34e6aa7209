//! Crate implementing mantissa-bit truncation of `f32` data, as a lossy precursor to zlib compression.
//!
//! # Overview
//! Floating point data compresses poorly with generic byte compressors: the low mantissa bits are
//! essentially noise. If the data only needs, say, 3 significant decimal digits, most of those bits
//! can be zeroed (with rounding) *before* compression, which makes the byte stream much more
//! repetitive. zlib itself stays lossless; the only loss is the truncation, bounded by
//! about `2^(bits-24)` relative error.
//!
//! * [`truncation`]: the codec itself, pure functions over `f32` and `&[f32]`
//! * [`precision`]: decimal digits -> bits to drop, error bounds
//! * [`compressor`]: zlib, and truncate-then-zlib, behind a [`compressor::Compressor`] trait
//! * [`datagen`], [`benchmark`]: synthetic data and timing/accuracy measurements
//!
//! # Example
//! ```rust
//! use mantissa_trunc::truncation::truncate_array;
//! use mantissa_trunc::compressor::{Compressor, ZlibCompressor};
//!
//! let data: Vec<f32> = (0..1000).map(|i| 1.0 / (i as f32 + 1.0)).collect();
//! let truncated = truncate_array(&data, 13, true).unwrap();
//!
//! let zlib = ZlibCompressor::new(9).unwrap();
//! let compressed = zlib.compress(&truncated).unwrap();
//! let decompressed = zlib.decompress(&compressed, truncated.len()).unwrap();
//!
//! // round trips are checked against the *truncated* data, not the original
//! assert_eq!(decompressed, truncated);
//! ```
//!
//! # Note
//! `round = true` rounds to nearest but breaks exact ties **downwards**, not to even.
//! See [`truncation`] for the details and for how NaN/infinity are handled.
#![deny(missing_docs)]
pub mod benchmark;
pub mod compressor;
pub mod datagen;
mod error;
pub mod precision;
pub mod truncation;

pub use error::TruncError;
pub use truncation::{truncate, truncate_array, truncate_in_place, Rounding, Truncation};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, TruncError>;
