//! Error type shared by the whole crate.

use thiserror::Error;

/// Errors raised by truncation, compression and benchmarking.
#[derive(Debug, Error)]
pub enum TruncError {
    /// A numeric parameter fell outside its allowed range.
    /// Always a caller bug: values are never clamped.
    #[error("invalid argument `{name}`: {value} (must be between {min} and {max})")]
    InvalidArgument {
        /// name of the offending parameter
        name: &'static str,
        /// the value that was passed
        value: i64,
        /// smallest accepted value
        min: i64,
        /// largest accepted value
        max: i64,
    },

    /// Two buffers that must line up didn't.
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// expected length
        expected: usize,
        /// observed length
        actual: usize,
    },

    /// Parameters of a synthetic data distribution were rejected.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// The zlib stream could not be written or read.
    #[error("zlib stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl TruncError {
    /// Check that `value` lies in `[min, max]`, otherwise build an [`TruncError::InvalidArgument`].
    pub(crate) fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), TruncError> {
        if value < min || value > max {
            return Err(TruncError::InvalidArgument { name, value, min, max });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_check_range_bounds_inclusive() {
        assert!(TruncError::check_range("bits", 0, 0, 23).is_ok());
        assert!(TruncError::check_range("bits", 23, 0, 23).is_ok());
        assert!(TruncError::check_range("bits", 24, 0, 23).is_err());
        assert!(TruncError::check_range("bits", -1, 0, 23).is_err());
    }

    #[test]
    fn test_message() {
        let e = TruncError::check_range("bits", 24, 0, 23).unwrap_err();
        assert_eq!(e.to_string(), "invalid argument `bits`: 24 (must be between 0 and 23)");
    }
}
