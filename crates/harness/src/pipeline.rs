//! End-to-end simulation pipeline: load, evaluate, estimate cost

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use svmsim_engine::{
    ArchitectureVariant, Classifier, FloatReference, HardwareCostModel, KernelInferenceEngine,
    LinearInferenceEngine, StructuralParams,
};
use svmsim_model::{
    Accumulation, KernelModelParams, LinearModelParams, LutConfig, ParameterLoader,
    SimulatorConfig, TestVectors,
};

use crate::error::{HarnessError, Result};
use crate::evaluation::Evaluation;
use crate::report::{CostReport, SimulationReport};

/// Which parameter record a run loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Linear,
    Kernel,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Kernel => f.write_str("kernel"),
        }
    }
}

impl FromStr for ModelKind {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "kernel" | "rbf" => Ok(Self::Kernel),
            other => Err(HarnessError::InvalidInput(format!(
                "unknown model kind {:?} (expected linear or kernel)",
                other
            ))),
        }
    }
}

/// A fixed-point engine paired with its float reference
pub struct LoadedModel {
    kind: ModelKind,
    engine: Box<dyn Classifier>,
    reference: FloatReference,
    structure: StructuralParams,
    variant: ArchitectureVariant,
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("kind", &self.kind)
            .field("structure", &self.structure)
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl LoadedModel {
    pub fn linear(params: LinearModelParams, accumulation: Accumulation) -> Self {
        let reference = FloatReference::linear(&params);
        let structure = StructuralParams::from(&params);
        Self {
            kind: ModelKind::Linear,
            engine: Box::new(LinearInferenceEngine::with_accumulation(params, accumulation)),
            reference,
            structure,
            variant: ArchitectureVariant::linear_for(accumulation),
        }
    }

    pub fn kernel(
        params: KernelModelParams,
        lut: LutConfig,
        accumulation: Accumulation,
    ) -> Result<Self> {
        let reference = FloatReference::kernel(&params);
        let structure = StructuralParams::from(&params);
        let engine = KernelInferenceEngine::with_accumulation(params, lut, accumulation)?;
        Ok(Self {
            kind: ModelKind::Kernel,
            engine: Box::new(engine),
            reference,
            structure,
            variant: ArchitectureVariant::IterativeKernel,
        })
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn engine(&self) -> &dyn Classifier {
        self.engine.as_ref()
    }

    pub fn reference(&self) -> &FloatReference {
        &self.reference
    }

    pub fn structure(&self) -> StructuralParams {
        self.structure
    }

    pub fn variant(&self) -> ArchitectureVariant {
        self.variant
    }

    pub fn evaluate(&self, vectors: &TestVectors) -> Result<Evaluation> {
        Evaluation::run(self.engine(), &self.reference, vectors)
    }
}

/// Configured simulator: one format, one table geometry, one cost model
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    loader: ParameterLoader,
    cost_model: HardwareCostModel,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            loader: ParameterLoader::new(config.format),
            cost_model: HardwareCostModel::new(config.kernel_pipeline_latency),
            config,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn loader(&self) -> &ParameterLoader {
        &self.loader
    }

    pub fn cost_model(&self) -> &HardwareCostModel {
        &self.cost_model
    }

    pub fn load_model<P: AsRef<Path>>(&self, kind: ModelKind, path: P) -> Result<LoadedModel> {
        match kind {
            ModelKind::Linear => {
                let params = self.loader.linear_from_file(path)?;
                Ok(self.linear_model(params))
            }
            ModelKind::Kernel => {
                let params = self.loader.kernel_from_file(path)?;
                self.kernel_model(params)
            }
        }
    }

    pub fn linear_model(&self, params: LinearModelParams) -> LoadedModel {
        LoadedModel::linear(params, self.config.accumulation)
    }

    pub fn kernel_model(&self, params: KernelModelParams) -> Result<LoadedModel> {
        LoadedModel::kernel(params, self.config.lut(), self.config.accumulation)
    }

    pub fn load_vectors<P: AsRef<Path>>(&self, path: P) -> Result<TestVectors> {
        Ok(self.loader.test_vectors_from_file(path)?)
    }

    /// Evaluate `model` on `vectors` and estimate its hardware cost
    pub fn run(&self, model: &LoadedModel, vectors: &TestVectors) -> Result<SimulationReport> {
        let evaluation = model.evaluate(vectors)?;
        let cost = CostReport::new(
            &self.cost_model,
            model.variant(),
            model.structure(),
            self.config.clock_mhz,
            evaluation.per_sample_tally,
        )?;

        Ok(SimulationReport {
            kind: model.kind(),
            format: self.config.format.to_string(),
            evaluation,
            cost,
        })
    }
}
