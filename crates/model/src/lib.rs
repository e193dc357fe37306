//! svmsim Model Parameters
//!
//! Boundary with the external quantization stage: validated, immutable
//! parameter records for the linear and RBF-kernel classifiers, JSON loading of
//! records and test vectors, and the simulator configuration.

mod config;
mod error;
mod loader;
mod params;
mod vectors;

pub use config::{Accumulation, LutConfig, SimulatorConfig};
pub use error::{ModelError, Result};
pub use loader::{
    DualCoefRecord, KernelParamsRecord, LinearParamsRecord, ParameterLoader, TestVectorsRecord,
};
pub use params::{KernelModelParams, LinearModelParams};
pub use vectors::TestVectors;
