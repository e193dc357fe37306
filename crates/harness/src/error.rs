//! Harness error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Model error: {0}")]
    Model(#[from] svmsim_model::ModelError),

    #[error("Engine error: {0}")]
    Engine(#[from] svmsim_engine::EngineError),

    #[error("Fixed-point error: {0}")]
    FixedPoint(#[from] svmsim_fixed_point::FixedPointError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
