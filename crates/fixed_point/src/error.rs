//! Fixed-point error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FixedPointError {
    #[error("Invalid format: total_bits={total_bits}, frac_bits={frac_bits} (need 2 <= total_bits <= 32 and frac_bits < total_bits)")]
    InvalidFormat { total_bits: u8, frac_bits: u8 },

    #[error("Invalid Q-notation: {0:?} (expected e.g. \"Q8.8\")")]
    InvalidQNotation(String),

    #[error("Value {value} outside format range [{min}, {max}]")]
    OutOfRange { value: i64, min: i32, max: i32 },

    #[error("Format mismatch: expected {expected}, got {got}")]
    FormatMismatch { expected: String, got: String },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

pub type Result<T> = std::result::Result<T, FixedPointError>;
