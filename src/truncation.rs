//! Mantissa-bit truncation of `f32` values.
//!
//! The IEEE 754 binary32 format stores 1 sign bit, 8 exponent bits and 23 mantissa bits.
//! Truncating `bits` of the mantissa zeroes its `bits` least significant bits, which makes
//! the data far more repetitive for a downstream byte compressor (zlib), at the cost of a
//! relative error of about `2^(bits-24)`.
//!
//! # Example
//! ```rust
//! use mantissa_trunc::truncation::{truncate, truncate_array};
//! let third = 1.0_f32 / 3.0;
//! assert_eq!(third.to_bits(), 0x3EAA_AAAB);
//!
//! // with rounding: dropped bits 0xB are past the midpoint 0x8, so we round up
//! assert_eq!(truncate(third, 4, true).unwrap().to_bits(), 0x3EAA_AAB0);
//! // without: plain masking
//! assert_eq!(truncate(third, 4, false).unwrap().to_bits(), 0x3EAA_AAA0);
//!
//! let data = vec![0.1_f32, 0.2, 0.3];
//! let truncated = truncate_array(&data, 12, true).unwrap();
//! assert_eq!(truncated.len(), data.len());
//! ```
//!
//! # Rounding
//! `round = true` rounds to nearest, but an *exact* tie (dropped bits equal to `1 << (bits-1)`)
//! rounds **down**, not to even. Ties-to-even rounding is available via
//! [`Rounding::NearestTiesEven`].
//!
//! A side effect of the strict comparison: with `bits == 1` the only nonzero dropped value
//! *is* the midpoint, so rounding never kicks in.
//!
//! # Special values
//! NaN and ±infinity are returned unchanged, whatever `bits` is.
//! Everything finite (including subnormals and ±0) goes through the bit manipulation.
//! Rounding can carry into the exponent: the largest subnormals may become
//! [`f32::MIN_POSITIVE`], and values near [`f32::MAX`] may become infinite.

use crate::{Result, TruncError};

/// Number of explicitly stored mantissa bits in an `f32`.
pub const MANTISSA_BITS: u32 = 23;

/// sign + exponent bits of an `f32`
pub const SIGN_EXPONENT_MASK: u32 = !((1 << MANTISSA_BITS) - 1);

/// How the dropped mantissa bits influence the kept ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Zero the dropped bits, no adjustment.
    Truncate,
    /// Round up if the dropped bits are strictly past the midpoint; exact ties round down.
    /// This is what `round = true` means throughout the crate.
    #[default]
    NearestTiesDown,
    /// IEEE 754 round-half-to-even.
    NearestTiesEven,
}

impl From<bool> for Rounding {
    fn from(round: bool) -> Self {
        if round {
            Rounding::NearestTiesDown
        } else {
            Rounding::Truncate
        }
    }
}

/// A validated truncation setting.
///
/// Validating once and applying many times is what the array functions do internally;
/// holding on to a `Truncation` lets callers do the same.
///
/// ```rust
/// use mantissa_trunc::truncation::{Truncation, Rounding};
/// let t = Truncation::new(20, Rounding::Truncate).unwrap();
/// assert_eq!(t.drop_mask(), 0x000F_FFFF);
/// assert_eq!(t.apply(3.3333333).to_bits() & t.drop_mask(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    bits: u32,
    rounding: Rounding,
    drop_mask: u32,
    keep_mask: u32,
}

impl Truncation {
    /// Drop `bits` (in `[0, 23]`) mantissa bits using the given rounding.
    /// `rounding` can be a plain `bool` (see [`Rounding::from`]).
    pub fn new(bits: i32, rounding: impl Into<Rounding>) -> Result<Self> {
        TruncError::check_range("bits", bits.into(), 0, MANTISSA_BITS.into())?;
        let bits = bits as u32;
        let drop_mask = (1_u32 << bits) - 1;
        Ok(Truncation {
            bits,
            rounding: rounding.into(),
            drop_mask,
            keep_mask: !drop_mask,
        })
    }

    /// The do-nothing truncation (`bits == 0`).
    pub fn identity() -> Self {
        Truncation {
            bits: 0,
            rounding: Rounding::Truncate,
            drop_mask: 0,
            keep_mask: u32::MAX,
        }
    }

    /// number of mantissa bits dropped
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// rounding applied before the dropped bits are zeroed
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// `(1 << bits) - 1`
    pub fn drop_mask(&self) -> u32 {
        self.drop_mask
    }

    /// `!drop_mask`; also the largest pattern that can be rounded without wrapping
    pub fn keep_mask(&self) -> u32 {
        self.keep_mask
    }

    /// Truncate a single value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        if self.bits == 0 || !value.is_finite() {
            return value;
        }

        let int_val = value.to_bits();
        let mut truncated = int_val & self.keep_mask;

        // keep_mask is the only pattern where adding one unit would overflow the u32
        if self.rounding != Rounding::Truncate && truncated < self.keep_mask {
            let dropped = int_val & self.drop_mask;
            let half = 1_u32 << (self.bits - 1);
            let kept_is_odd = (truncated >> self.bits) & 1 == 1;

            let round_up = match self.rounding {
                Rounding::Truncate => false,
                Rounding::NearestTiesDown => dropped > half,
                Rounding::NearestTiesEven => dropped > half || (dropped == half && kept_is_odd),
            };
            if round_up {
                // a carry out of the mantissa lands in the exponent, which is the correct next float
                truncated = ((truncated >> self.bits) + 1) << self.bits;
            }
        }
        f32::from_bits(truncated)
    }

    /// Truncate every element into a new vector (same length, same order).
    pub fn apply_slice(&self, data: &[f32]) -> Vec<f32> {
        data.iter().map(|&x| self.apply(x)).collect()
    }

    /// Truncate every element in place.
    pub fn apply_in_place(&self, data: &mut [f32]) {
        for x in data.iter_mut() {
            *x = self.apply(*x);
        }
    }
}

/// Drop the `bits` least significant mantissa bits of `value`.
///
/// * `bits`: in `[0, 23]`; 0 returns `value` untouched, 23 keeps only sign and exponent
/// * `round`: round to nearest (ties down) before zeroing, see the [module docs](self)
///
/// # Errors
/// [`TruncError::InvalidArgument`] if `bits` is out of range.
pub fn truncate(value: f32, bits: i32, round: bool) -> Result<f32> {
    Ok(Truncation::new(bits, round)?.apply(value))
}

/// Element-wise [`truncate`], returning a new vector.
/// `bits` is validated before touching any element.
pub fn truncate_array(data: &[f32], bits: i32, round: bool) -> Result<Vec<f32>> {
    Ok(Truncation::new(bits, round)?.apply_slice(data))
}

/// Same as [`truncate_array`] but overwrites `data`.
pub fn truncate_in_place(data: &mut [f32], bits: i32, round: bool) -> Result<()> {
    Truncation::new(bits, round)?.apply_in_place(data);
    Ok(())
}
