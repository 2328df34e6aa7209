//! Translating "decimal digits of precision" into a number of mantissa bits to drop.
//!
//! An `f32` carries 24 significant bits (23 stored), i.e. a bit more than 7 decimal digits.
//! Keeping `d` digits needs `ceil(log2(10^d))` mantissa bits, the rest may go.

use crate::truncation::{Rounding, MANTISSA_BITS};
use crate::{Result, TruncError};

/// Largest number of decimal digits an `f32` can be asked to keep.
pub const MAX_DECIMAL_DIGITS: i32 = 7;

/// Number of mantissa bits that can be dropped while keeping `digits` decimal digits.
///
/// `digits` must be in `[1, 7]`. Seven digits need all 24 significant bits,
/// so nothing is dropped.
/// ```rust
/// use mantissa_trunc::precision::bits_for_precision;
/// assert_eq!(bits_for_precision(3).unwrap(), 13);
/// assert_eq!(bits_for_precision(7).unwrap(), 0);
/// assert!(bits_for_precision(8).is_err());
/// ```
pub fn bits_for_precision(digits: i32) -> Result<u32> {
    TruncError::check_range("precision", digits.into(), 1, MAX_DECIMAL_DIGITS.into())?;
    let needed = bits_needed(10_u64.pow(digits as u32));
    Ok(MANTISSA_BITS.saturating_sub(needed))
}

/// smallest `n` with `2^n >= x`, i.e. `ceil(log2(x))` for `x >= 1`
fn bits_needed(x: u64) -> u32 {
    u64::BITS - (x - 1).leading_zeros()
}

/// Upper bound on `|truncated - original| / |original|` for normal, finite results.
///
/// Masking loses up to (but excluding) one unit of the last kept bit, `2^(bits-23)`;
/// rounding to nearest halves that.
pub fn max_relative_error(bits: u32, rounding: Rounding) -> f64 {
    if bits == 0 {
        return 0.0;
    }
    let exponent = bits as i32 - MANTISSA_BITS as i32;
    match rounding {
        Rounding::Truncate => 2_f64.powi(exponent),
        Rounding::NearestTiesDown | Rounding::NearestTiesEven => 2_f64.powi(exponent - 1),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::truncation::Truncation;
    use pretty_assertions::assert_eq;
    use rand::{distributions::Distribution, rngs::StdRng, SeedableRng};
    use rand_distr::Uniform;

    #[test]
    fn test_bits_table() {
        let table: Vec<u32> = (1..=7).map(|d| bits_for_precision(d).unwrap()).collect();
        assert_eq!(table, vec![19, 16, 13, 9, 6, 3, 0]);
    }

    #[test]
    fn test_matches_float_formula() {
        for d in 1..7 {
            let float_version = 23 - (10_f64.powi(d).log2().ceil() as u32);
            assert_eq!(bits_for_precision(d).unwrap(), float_version);
        }
    }

    #[test]
    fn test_invalid_precision() {
        assert!(bits_for_precision(0).is_err());
        assert!(bits_for_precision(-3).is_err());
        assert!(matches!(
            bits_for_precision(8),
            Err(TruncError::InvalidArgument { name: "precision", value: 8, min: 1, max: 7 })
        ));
    }

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(1), 0);
        assert_eq!(bits_needed(2), 1);
        assert_eq!(bits_needed(10), 4);
        assert_eq!(bits_needed(16), 4);
        assert_eq!(bits_needed(17), 5);
    }

    #[test]
    fn test_error_bound_holds() {
        let mut rng = StdRng::seed_from_u64(1234);
        let dist = Uniform::new(1e-30_f32, 1e30);
        let values: Vec<f32> = (0..20_000)
            .map(|i| {
                let v = dist.sample(&mut rng);
                if i % 2 == 0 { v } else { -v }
            })
            .collect();

        for bits in 0..=23 {
            for rounding in [Rounding::Truncate, Rounding::NearestTiesDown, Rounding::NearestTiesEven] {
                let t = Truncation::new(bits, rounding).unwrap();
                let bound = max_relative_error(bits as u32, rounding);
                for &v in &values {
                    let out = t.apply(v) as f64;
                    let rel = (out - v as f64).abs() / (v as f64).abs();
                    assert!(rel <= bound, "{v} bits={bits} {rounding:?}: {rel} > {bound}");
                }
            }
        }
    }

    #[test]
    fn test_precision_digits_survive() {
        // 3 digits -> 13 bits dropped: relative error well below 1e-3
        let bits = bits_for_precision(3).unwrap();
        assert!(max_relative_error(bits, Rounding::NearestTiesDown) < 1e-3);
        assert_eq!(max_relative_error(0, Rounding::Truncate), 0.0);
        assert_eq!(max_relative_error(23, Rounding::Truncate), 1.0);
    }
}
