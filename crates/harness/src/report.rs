//! Hardware cost and combined run reports

use std::fmt;

use serde::Serialize;
use svmsim_engine::{
    ArchitectureVariant, CycleEstimate, HardwareCostModel, OperationTally, StructuralParams,
};

use crate::error::Result;
use crate::evaluation::Evaluation;
use crate::pipeline::ModelKind;

/// Estimated hardware cost of one inference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostReport {
    pub variant: ArchitectureVariant,
    pub structure: StructuralParams,
    pub cycles: CycleEstimate,
    pub clock_mhz: f64,
    pub latency_ns: f64,
    /// Operations spent by a single call
    pub per_sample: OperationTally,
}

impl CostReport {
    pub fn new(
        cost_model: &HardwareCostModel,
        variant: ArchitectureVariant,
        structure: StructuralParams,
        clock_mhz: f64,
        per_sample: OperationTally,
    ) -> Result<Self> {
        let cycles = cost_model.estimate_cycles(variant, structure)?;
        Ok(Self {
            variant,
            structure,
            cycles,
            clock_mhz,
            latency_ns: cycles.latency_ns(clock_mhz),
            per_sample,
        })
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = &self.per_sample;
        writeln!(f, "Architecture:       {}", self.variant)?;
        writeln!(
            f,
            "Structure:          {} features, {} support vectors",
            self.structure.n_features, self.structure.n_support
        )?;
        writeln!(f, "Cycles:             {}", self.cycles.cycles())?;
        writeln!(
            f,
            "Latency:            {:.1} ns @ {} MHz",
            self.latency_ns, self.clock_mhz
        )?;
        write!(
            f,
            "Ops/sample:         {} mac, {} add, {} mul, {} lut, {} cmp",
            t.multiply_accumulate, t.add, t.multiply, t.lookup, t.compare
        )
    }
}

/// Everything one `svmsim-eval` run produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub kind: ModelKind,
    pub format: String,
    pub evaluation: Evaluation,
    pub cost: CostReport,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} SVM ({}) ===", self.kind, self.format)?;
        writeln!(f)?;
        writeln!(f, "--- Accuracy ---")?;
        writeln!(f, "{}", self.evaluation)?;
        writeln!(f)?;
        writeln!(f, "--- Hardware cost ---")?;
        write!(f, "{}", self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_report_linear_16() {
        let mut tally = OperationTally::new();
        tally.count_mac(16);
        tally.count_add(1);
        tally.count_compare(1);

        let report = CostReport::new(
            &HardwareCostModel::default(),
            ArchitectureVariant::FullyParallelLinear,
            StructuralParams::linear(16),
            100.0,
            tally,
        )
        .unwrap();
        assert_eq!(report.cycles.cycles(), 6);
        assert!((report.latency_ns - 60.0).abs() < 1e-9);
        assert!(report.to_string().contains("fully_parallel_linear"));
    }

    #[test]
    fn test_cost_report_serializes_variant_name() {
        let report = CostReport::new(
            &HardwareCostModel::new(8),
            ArchitectureVariant::IterativeKernel,
            StructuralParams::kernel(16, 40),
            100.0,
            OperationTally::new(),
        )
        .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["variant"], "iterative_kernel");
        assert_eq!(json["cycles"], 23);
    }

    #[test]
    fn test_cost_report_rejects_empty_structure() {
        assert!(CostReport::new(
            &HardwareCostModel::default(),
            ArchitectureVariant::IterativeKernel,
            StructuralParams::kernel(0, 4),
            100.0,
            OperationTally::new(),
        )
        .is_err());
    }
}
