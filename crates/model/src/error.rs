//! Parameter loading and validation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] svmsim_fixed_point::FixedPointError),

    #[error("Dimension mismatch in {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        what: String,
        expected: usize,
        got: usize,
    },

    #[error("Value out of range in {what}: {value} not in [{min}, {max}]")]
    ValueOutOfRange {
        what: String,
        value: i64,
        min: i32,
        max: i32,
    },

    #[error("Format mismatch: record declares {declared}, configured {configured}")]
    FormatMismatch { declared: String, configured: String },

    #[error("Invalid label at index {index}: {value} (must be 0 or 1)")]
    InvalidLabel { index: usize, value: i64 },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
