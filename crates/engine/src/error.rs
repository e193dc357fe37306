//! Engine error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Model error: {0}")]
    Model(#[from] svmsim_model::ModelError),

    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] svmsim_fixed_point::FixedPointError),

    #[error("Dimension mismatch: expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Input value {value} at feature {index} outside format range [{min}, {max}]")]
    ValueOutOfRange {
        index: usize,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("Invalid lookup table: {0}")]
    InvalidLut(String),

    #[error("Invalid structure for {variant}: {message}")]
    InvalidStructure { variant: String, message: String },

    #[error("Unknown architecture variant: {0:?}")]
    UnknownArchitecture(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
