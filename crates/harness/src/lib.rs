//! svmsim Evaluation Harness
//!
//! Loads quantized parameter records and test vectors, runs the fixed-point
//! engines against their floating-point reference, and reports accuracy and
//! estimated hardware cost.

pub mod analysis;
mod error;
mod evaluation;
mod pipeline;
mod report;
pub mod synthetic;

pub use analysis::KernelNoise;
pub use error::{HarnessError, Result};
pub use evaluation::{ConfusionMatrix, Evaluation};
pub use pipeline::{LoadedModel, ModelKind, Simulator};
pub use report::{CostReport, SimulationReport};
pub use synthetic::{SyntheticConfig, SyntheticProblem};
