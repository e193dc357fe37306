//! Bit-accurate fixed-point SVM inference engines
//!
//! Linear and RBF-kernel classifiers that reproduce the integer data path of a
//! hardware accelerator, with per-call operation tallies, a structural cycle
//! model and a floating-point reference.

pub mod accumulate;
pub mod batch;
pub mod classifier;
pub mod cost;
pub mod error;
pub mod kernel;
pub mod linear;
pub mod lut;
pub mod reference;
pub mod tally;

pub use batch::{predict_batch, run_batch, summarize, BatchSummary};
pub use classifier::{Classifier, Prediction};
pub use cost::{
    estimate_cycles, ArchitectureVariant, CycleEstimate, HardwareCostModel, StructuralParams,
    DEFAULT_KERNEL_PIPELINE_LATENCY,
};
pub use error::{EngineError, Result};
pub use kernel::KernelInferenceEngine;
pub use linear::LinearInferenceEngine;
pub use lut::ExpLookupTable;
pub use reference::FloatReference;
pub use tally::OperationTally;

pub use svmsim_model::{Accumulation, LutConfig};
