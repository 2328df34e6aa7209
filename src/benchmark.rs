//! Timing compress/decompress runs and measuring what truncation costs in accuracy.
//!
//! ```rust
//! use mantissa_trunc::benchmark::Benchmark;
//! use mantissa_trunc::compressor::TruncatingCompressor;
//!
//! let data: Vec<f32> = (0..10_000).map(|i| i as f32 * 0.001).collect();
//! let c = TruncatingCompressor::zlib_with_precision(3, 6).unwrap();
//! let report = Benchmark::new("ramp", 2).unwrap().run(&c, &data).unwrap();
//! assert!(report.ratio > 1.0);
//! assert!(report.error.max < 1e-3 * 10.0);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use itertools::{izip, Itertools, MinMaxResult};
use tracing::{debug, info};

use crate::compressor::{Compressor, TruncatingCompressor, FLOAT_BYTES};
use crate::truncation::Truncation;
use crate::{Result, TruncError};

/// Absolute error between original and decompressed data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ErrorStats {
    /// mean of `|a - b|`
    pub mean: f64,
    /// smallest `|a - b|`
    pub min: f64,
    /// largest `|a - b|`
    pub max: f64,
}

impl ErrorStats {
    /// Element-wise absolute error between `original` and `decompressed`.
    /// Empty input gives all zeros.
    pub fn between(original: &[f32], decompressed: &[f32]) -> Result<Self> {
        if original.len() != decompressed.len() {
            return Err(TruncError::LengthMismatch {
                expected: original.len(),
                actual: decompressed.len(),
            });
        }
        let errors: Vec<f64> = izip!(original, decompressed)
            .map(|(&a, &b)| (a as f64 - b as f64).abs())
            .collect();

        let (min, max) = match errors.iter().copied().minmax() {
            MinMaxResult::NoElements => return Ok(ErrorStats::default()),
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let mean = errors.iter().sum::<f64>() / errors.len() as f64;
        Ok(ErrorStats { mean, min, max })
    }
}

/// Outcome of one [`Benchmark::run`].
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    /// benchmark label
    pub name: String,
    /// [`Compressor::name`] of what was measured
    pub compressor: String,
    /// uncompressed size in bytes
    pub n_bytes: usize,
    /// compressed size in bytes
    pub compressed_bytes: usize,
    /// mean wall time of a compression
    pub compress_time: Duration,
    /// mean wall time of a decompression
    pub decompress_time: Duration,
    /// `n_bytes / compressed_bytes`
    pub ratio: f64,
    /// error of the decompressed data w.r.t. the original (not the truncated) data
    pub error: ErrorStats,
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ {} ] {}: {} -> {} bytes, ratio {:.4}, compress {:.3} ms, decompress {:.3} ms, error avg {:.3e} min {:.3e} max {:.3e}",
            self.name,
            self.compressor,
            self.n_bytes,
            self.compressed_bytes,
            self.ratio,
            self.compress_time.as_secs_f64() * 1e3,
            self.decompress_time.as_secs_f64() * 1e3,
            self.error.mean,
            self.error.min,
            self.error.max,
        )
    }
}

/// Repeatedly compresses and decompresses a dataset, averaging the timings.
#[derive(Debug, Clone)]
pub struct Benchmark {
    name: String,
    iterations: u32,
}

impl Benchmark {
    /// `iterations` must be at least 1
    pub fn new(name: impl Into<String>, iterations: u32) -> Result<Self> {
        TruncError::check_range("iterations", iterations.into(), 1, u32::MAX.into())?;
        Ok(Benchmark { name: name.into(), iterations })
    }

    /// Run `compressor` over `data`.
    pub fn run<C: Compressor + ?Sized>(&self, compressor: &C, data: &[f32]) -> Result<BenchmarkReport> {
        let mut compressed = Vec::new();
        let mut compress_total = Duration::ZERO;
        for i in 0..self.iterations {
            debug!(name = %self.name, iteration = i + 1, of = self.iterations, "compression");
            let start = Instant::now();
            compressed = compressor.compress(data)?;
            compress_total += start.elapsed();
        }

        let mut decompressed = Vec::new();
        let mut decompress_total = Duration::ZERO;
        for i in 0..self.iterations {
            debug!(name = %self.name, iteration = i + 1, of = self.iterations, "decompression");
            let start = Instant::now();
            decompressed = compressor.decompress(&compressed, data.len())?;
            decompress_total += start.elapsed();
        }

        let n_bytes = data.len() * FLOAT_BYTES;
        let report = BenchmarkReport {
            name: self.name.clone(),
            compressor: compressor.name(),
            n_bytes,
            compressed_bytes: compressed.len(),
            compress_time: compress_total / self.iterations,
            decompress_time: decompress_total / self.iterations,
            ratio: n_bytes as f64 / compressed.len() as f64,
            error: ErrorStats::between(data, &decompressed)?,
        };
        info!(
            name = %report.name,
            compressor = %report.compressor,
            ratio = report.ratio,
            max_error = report.error.max,
            "benchmark done"
        );
        Ok(report)
    }
}

/// Benchmark truncation + zlib for every level in `levels`, e.g. `1..=9`.
pub fn sweep_levels(
    data: &[f32],
    bits: i32,
    round: bool,
    levels: impl IntoIterator<Item = i32>,
    iterations: u32,
) -> Result<Vec<BenchmarkReport>> {
    let bench = Benchmark::new(format!("sweep_bits{bits}"), iterations)?;
    levels
        .into_iter()
        .map(|level| {
            let compressor = TruncatingCompressor::zlib(bits, level, round)?;
            bench.run(&compressor, data)
        })
        .collect()
}

/// Benchmark truncation + zlib at a fixed `level` for every number of dropped bits in `bits`,
/// e.g. `0..=23`.
pub fn sweep_bits(
    data: &[f32],
    bits: impl IntoIterator<Item = i32>,
    level: i32,
    round: bool,
    iterations: u32,
) -> Result<Vec<BenchmarkReport>> {
    let bench = Benchmark::new(format!("sweep_level{level}"), iterations)?;
    bits.into_iter()
        .map(|b| {
            let compressor = TruncatingCompressor::zlib(b, level, round)?;
            bench.run(&compressor, data)
        })
        .collect()
}

/// Does `compressor` give back exactly `truncation.apply_slice(data)`, bit for bit?
pub fn verify_round_trip<C: Compressor + ?Sized>(compressor: &C, data: &[f32], truncation: Truncation) -> Result<bool> {
    let compressed = compressor.compress(data)?;
    let decompressed = compressor.decompress(&compressed, data.len())?;
    let expected = truncation.apply_slice(data);
    Ok(decompressed.len() == expected.len()
        && izip!(&decompressed, &expected).all(|(a, b)| a.to_bits() == b.to_bits()))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::compressor::ZlibCompressor;
    use crate::datagen::{generate, DataSource};
    use crate::precision::{bits_for_precision, max_relative_error};
    use crate::truncation::Rounding;
    use pretty_assertions::assert_eq;

    fn uniform(n: usize) -> Vec<f32> {
        generate(DataSource::Uniform { min: 0.0, max: 100.0 }, n, 12345).unwrap()
    }

    #[test]
    fn test_error_stats() {
        let s = ErrorStats::between(&[1.0, 2.0, 3.0], &[1.5, 2.0, 2.0]).unwrap();
        assert_eq!(s, ErrorStats { mean: 0.5, min: 0.0, max: 1.0 });
    }

    #[test]
    fn test_error_stats_single_and_empty() {
        let s = ErrorStats::between(&[1.0], &[1.25]).unwrap();
        assert_eq!(s, ErrorStats { mean: 0.25, min: 0.25, max: 0.25 });
        assert_eq!(ErrorStats::between(&[], &[]).unwrap(), ErrorStats::default());
    }

    #[test]
    fn test_error_stats_length_mismatch() {
        assert!(matches!(
            ErrorStats::between(&[1.0, 2.0], &[1.0]),
            Err(TruncError::LengthMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_zero_iterations() {
        assert!(Benchmark::new("x", 0).is_err());
    }

    #[test]
    fn test_lossless_report() {
        let data = uniform(10_000);
        let report = Benchmark::new("plain", 2).unwrap().run(&ZlibCompressor::new(6).unwrap(), &data).unwrap();
        assert_eq!(report.n_bytes, 40_000);
        assert_eq!(report.error, ErrorStats::default());
        assert_eq!(report.compressor, "zlib(level=6)");
        assert!(report.ratio > 0.0);
    }

    #[test]
    fn test_truncated_report_error_bounded() {
        let data = uniform(10_000);
        let bits = bits_for_precision(3).unwrap();
        let c = TruncatingCompressor::zlib(bits as i32, 9, true).unwrap();
        let report = Benchmark::new("trunc", 1).unwrap().run(&c, &data).unwrap();

        // all values are below 128 = 2^7
        let bound = 128.0 * max_relative_error(bits, Rounding::NearestTiesDown);
        assert!(report.error.max <= bound);
        assert!(report.error.max > 0.0);
        assert!(report.ratio > 1.0);
    }

    #[test]
    fn test_sweep() {
        let data = uniform(5_000);
        let reports = sweep_levels(&data, 13, true, 1..=9, 1).unwrap();
        assert_eq!(reports.len(), 9);
        // truncation doesn't depend on the level
        assert!(reports.iter().all(|r| r.error == reports[0].error));
        assert!(sweep_levels(&data, 13, true, [10], 1).is_err());
    }

    #[test]
    fn test_sweep_bits() {
        let data = generate(DataSource::Sine { xmin: 0.0, xmax: 100.0 }, 20_000, 0).unwrap();
        let bits = [0, 4, 8, 12, 16, 20, 23];
        let reports = sweep_bits(&data, bits, 9, false, 1).unwrap();
        assert_eq!(reports.len(), bits.len());
        assert!(reports.iter().all(|r| r.name == "sweep_level9"));

        // dropping more bits never makes the output bigger, or the result less accurate
        for (fewer, more) in reports.iter().tuple_windows() {
            assert!(more.compressed_bytes <= fewer.compressed_bytes, "{fewer}\n{more}");
            assert!(more.error.max >= fewer.error.max);
        }
        assert_eq!(reports[0].error, ErrorStats::default());
        assert!(reports[6].ratio > 2.0 * reports[0].ratio);

        assert!(sweep_bits(&data, [24], 9, false, 1).is_err());
    }

    #[test]
    fn test_verify_round_trip() {
        let data = uniform(5_000);
        let t = Truncation::new(10, true).unwrap();
        let c = TruncatingCompressor::new(t, ZlibCompressor::new(6).unwrap());
        assert!(verify_round_trip(&c, &data, t).unwrap());

        // plain zlib doesn't truncate, so comparing against truncated data fails
        assert!(!verify_round_trip(&ZlibCompressor::new(6).unwrap(), &data, t).unwrap());
        assert!(verify_round_trip(&ZlibCompressor::new(6).unwrap(), &data, Truncation::identity()).unwrap());
    }

    #[test]
    fn test_display() {
        let data = uniform(100);
        let report = Benchmark::new("disp", 1).unwrap().run(&ZlibCompressor::new(1).unwrap(), &data).unwrap();
        let line = report.to_string();
        assert!(line.starts_with("[ disp ] zlib(level=1): 400 -> "));
    }
}
