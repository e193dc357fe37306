//! Structural cycle model for named hardware architectures
//!
//! Estimates depend only on the architecture variant and structural sizes,
//! never on sample data or tally contents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use svmsim_model::{Accumulation, KernelModelParams, LinearModelParams};

use crate::accumulate::adder_tree_depth;
use crate::error::{EngineError, Result};

/// Per-support-vector pipeline latency of the iterative kernel design:
/// sub+square (1), 16-input adder tree (4), lookup (1), weighted multiply (1),
/// accumulate (1).
pub const DEFAULT_KERNEL_PIPELINE_LATENCY: u64 = 8;

/// Named hardware architecture assumptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArchitectureVariant {
    /// One multiplier per feature feeding a balanced adder tree
    FullyParallelLinear,
    /// A single MAC unit stepping through features, one per cycle
    SequentialLinear,
    /// Features in parallel, support vectors streamed through a fixed-latency pipeline
    IterativeKernel,
}

impl ArchitectureVariant {
    pub const ALL: [Self; 3] = [
        Self::FullyParallelLinear,
        Self::SequentialLinear,
        Self::IterativeKernel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FullyParallelLinear => "fully_parallel_linear",
            Self::SequentialLinear => "sequential_linear",
            Self::IterativeKernel => "iterative_kernel",
        }
    }

    /// Linear architecture whose reduction order matches `accumulation`
    pub fn linear_for(accumulation: Accumulation) -> Self {
        match accumulation {
            Accumulation::Sequential => Self::SequentialLinear,
            Accumulation::AdderTree => Self::FullyParallelLinear,
        }
    }
}

impl fmt::Display for ArchitectureVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArchitectureVariant {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| EngineError::UnknownArchitecture(s.to_string()))
    }
}

/// Structural sizes an estimate is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructuralParams {
    pub n_features: usize,
    /// Zero for linear models
    pub n_support: usize,
}

impl StructuralParams {
    pub fn linear(n_features: usize) -> Self {
        Self {
            n_features,
            n_support: 0,
        }
    }

    pub fn kernel(n_support: usize, n_features: usize) -> Self {
        Self {
            n_features,
            n_support,
        }
    }
}

impl From<&LinearModelParams> for StructuralParams {
    fn from(params: &LinearModelParams) -> Self {
        Self::linear(params.n_features())
    }
}

impl From<&KernelModelParams> for StructuralParams {
    fn from(params: &KernelModelParams) -> Self {
        Self::kernel(params.n_support(), params.n_features())
    }
}

/// Estimated clock cycles for one inference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleEstimate(pub u64);

impl CycleEstimate {
    pub fn cycles(&self) -> u64 {
        self.0
    }

    /// Wall-clock latency at `clock_mhz`
    pub fn latency_ns(&self, clock_mhz: f64) -> f64 {
        self.0 as f64 * 1000.0 / clock_mhz
    }
}

impl fmt::Display for CycleEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cycles", self.0)
    }
}

/// Cycle model with its declared architecture constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareCostModel {
    kernel_pipeline_latency: u64,
}

impl Default for HardwareCostModel {
    fn default() -> Self {
        Self {
            kernel_pipeline_latency: DEFAULT_KERNEL_PIPELINE_LATENCY,
        }
    }
}

impl HardwareCostModel {
    pub fn new(kernel_pipeline_latency: u64) -> Self {
        Self {
            kernel_pipeline_latency,
        }
    }

    pub fn kernel_pipeline_latency(&self) -> u64 {
        self.kernel_pipeline_latency
    }

    pub fn estimate_cycles(
        &self,
        variant: ArchitectureVariant,
        params: StructuralParams,
    ) -> Result<CycleEstimate> {
        let invalid = |message: &str| EngineError::InvalidStructure {
            variant: variant.to_string(),
            message: message.to_string(),
        };

        if params.n_features == 0 {
            return Err(invalid("n_features must be at least 1"));
        }

        let cycles = match variant {
            // adder-tree depth + bias add + compare
            ArchitectureVariant::FullyParallelLinear => adder_tree_depth(params.n_features) + 2,
            // one MAC per feature + bias add + compare
            ArchitectureVariant::SequentialLinear => params.n_features as u64 + 2,
            // first result after L cycles, then one per support vector
            ArchitectureVariant::IterativeKernel => {
                if params.n_support == 0 {
                    return Err(invalid("n_support must be at least 1"));
                }
                if self.kernel_pipeline_latency == 0 {
                    return Err(invalid("pipeline latency must be at least 1"));
                }
                self.kernel_pipeline_latency + (params.n_support as u64 - 1)
            }
        };

        Ok(CycleEstimate(cycles))
    }
}

/// `estimate_cycles` under the default architecture constants
pub fn estimate_cycles(
    variant: ArchitectureVariant,
    params: StructuralParams,
) -> Result<CycleEstimate> {
    HardwareCostModel::default().estimate_cycles(variant, params)
}
