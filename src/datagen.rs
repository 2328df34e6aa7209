//! Seeded synthetic data to benchmark against.
//!
//! Random sources (uniform, gaussian) depend on the seed; the smooth ones (sine, polynomial)
//! are sampled on an even grid over `[xmin, xmax]`. Any of them can be made noisy with
//! [`add_noise`].

use rand::{distributions::Distribution, rngs::StdRng, SeedableRng};
use rand_distr::{Normal, Uniform};

use crate::{Result, TruncError};

/// Bytes in a "MB" as far as data sizes are concerned.
pub const MB: usize = 1_000_000;

/// Shape of the generated data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataSource {
    /// uniform in `[min, max)`
    Uniform {
        /// lower bound
        min: f32,
        /// upper bound (exclusive)
        max: f32,
    },
    /// normal distribution
    Gaussian {
        /// mean
        mean: f32,
        /// standard deviation
        stddev: f32,
    },
    /// `sin(x)` on an even grid from `xmin` to `xmax` (both included)
    Sine {
        /// first x
        xmin: f64,
        /// last x
        xmax: f64,
    },
    /// `x^3 - 2x^2 + x + 1` on an even grid from `xmin` to `xmax` (both included)
    Polynomial {
        /// first x
        xmin: f64,
        /// last x
        xmax: f64,
    },
}

/// Number of `f32`s in `mb` megabytes (rounded down).
pub fn n_floats_for_megabytes(mb: f64) -> usize {
    (mb * MB as f64 / std::mem::size_of::<f32>() as f64) as usize
}

/// Generate `n` values from `source`. The same seed always gives the same data.
pub fn generate(source: DataSource, n: usize, seed: u64) -> Result<Vec<f32>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = match source {
        DataSource::Uniform { min, max } => {
            if !(min < max && (max - min).is_finite()) {
                return Err(TruncError::InvalidDistribution(format!(
                    "uniform needs finite min < max, got [{min}, {max})"
                )));
            }
            let dist = Uniform::new(min, max);
            dist.sample_iter(&mut rng).take(n).collect()
        }
        DataSource::Gaussian { mean, stddev } => normal(mean, stddev)?.sample_iter(&mut rng).take(n).collect(),
        DataSource::Sine { xmin, xmax } => grid(xmin, xmax, n)?.map(|x| x.sin() as f32).collect(),
        DataSource::Polynomial { xmin, xmax } => grid(xmin, xmax, n)?
            .map(|x| (x.powi(3) - 2.0 * x.powi(2) + x + 1.0) as f32)
            .collect(),
    };
    Ok(data)
}

/// Add zero-mean gaussian noise with standard deviation `noise` to every element.
/// `noise == 0` leaves the data untouched.
pub fn add_noise(data: &mut [f32], noise: f32, seed: u64) -> Result<()> {
    let dist = normal(0.0, noise)?;
    if noise == 0.0 {
        return Ok(());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    for x in data.iter_mut() {
        *x += dist.sample(&mut rng);
    }
    Ok(())
}

/// `rand_distr` accepts a negative standard deviation (it just flips the sign), we don't.
fn normal(mean: f32, stddev: f32) -> Result<Normal<f32>> {
    if !(mean.is_finite() && stddev.is_finite() && stddev >= 0.0) {
        return Err(TruncError::InvalidDistribution(format!(
            "gaussian needs a finite mean and a finite stddev >= 0, got mean={mean}, stddev={stddev}"
        )));
    }
    Normal::new(mean, stddev).map_err(|e| TruncError::InvalidDistribution(format!("gaussian(mean={mean}, stddev={stddev}): {e}")))
}

/// `n` evenly spaced points from `xmin` to `xmax`; a single point is just `xmin`
fn grid(xmin: f64, xmax: f64, n: usize) -> Result<impl Iterator<Item = f64>> {
    if !(xmin.is_finite() && xmax.is_finite() && xmin < xmax) {
        return Err(TruncError::InvalidDistribution(format!(
            "grid needs finite xmin < xmax, got [{xmin}, {xmax}]"
        )));
    }
    let step = if n > 1 { (xmax - xmin) / (n - 1) as f64 } else { 0.0 };
    Ok((0..n).map(move |i| xmin + i as f64 * step))
}
