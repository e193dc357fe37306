//! Fixed-point RBF-kernel classifier
//!
//! `decision = Σ_j α_j · LUT(‖x - sv_j‖²) + b`, with support vectors visited in
//! array order. That order is part of the result: saturating accumulation is
//! not associative, so a permuted model can decide differently near the rails.

use svmsim_fixed_point::FixedPointFormat;
use svmsim_model::{Accumulation, KernelModelParams, LutConfig};

use crate::accumulate::{adder_tree_adds, reduce_adder_tree};
use crate::classifier::{check_input, Classifier, Prediction};
use crate::error::Result;
use crate::lut::ExpLookupTable;
use crate::tally::OperationTally;

/// RBF-kernel classifier over validated, immutable parameters and a prebuilt table
#[derive(Debug, Clone)]
pub struct KernelInferenceEngine {
    params: KernelModelParams,
    lut: ExpLookupTable,
    accumulation: Accumulation,
}

impl KernelInferenceEngine {
    /// Engine with sequential distance accumulation
    pub fn new(params: KernelModelParams, lut_config: LutConfig) -> Result<Self> {
        Self::with_accumulation(params, lut_config, Accumulation::Sequential)
    }

    /// Build the exponential table from the model's gamma and wrap both
    pub fn with_accumulation(
        params: KernelModelParams,
        lut_config: LutConfig,
        accumulation: Accumulation,
    ) -> Result<Self> {
        let lut = ExpLookupTable::build(params.gamma(), params.format(), lut_config)?;

        tracing::debug!(
            n_support = params.n_support(),
            n_features = params.n_features(),
            lut_size = lut.size(),
            %accumulation,
            "Created kernel inference engine"
        );

        Ok(Self {
            params,
            lut,
            accumulation,
        })
    }

    pub fn params(&self) -> &KernelModelParams {
        &self.params
    }

    pub fn lut(&self) -> &ExpLookupTable {
        &self.lut
    }

    pub fn accumulation(&self) -> Accumulation {
        self.accumulation
    }

    /// `dist = add(dist, mul(d, d))` with `d = sub(x[i], sv[i])`, in feature order
    fn distance_sequential(&self, x: &[i32], sv: &[i32], tally: &mut OperationTally) -> i32 {
        let f = self.params.format();
        let dist = x.iter().zip(sv).fold(0i32, |dist, (&xi, &si)| {
            let diff = f.fixed_sub(xi, si);
            f.fixed_add(dist, f.fixed_multiply(diff, diff))
        });

        let n = x.len() as u64;
        tally.count_add(2 * n);
        tally.count_multiply(n);
        dist
    }

    /// Squared differences first, then a balanced adder tree
    fn distance_adder_tree(
        &self,
        x: &[i32],
        sv: &[i32],
        scratch: &mut Vec<i32>,
        tally: &mut OperationTally,
    ) -> i32 {
        let f = self.params.format();
        scratch.clear();
        scratch.extend(x.iter().zip(sv).map(|(&xi, &si)| {
            let diff = f.fixed_sub(xi, si);
            f.fixed_multiply(diff, diff)
        }));

        let n = x.len();
        tally.count_add(n as u64 + adder_tree_adds(n));
        tally.count_multiply(n as u64);
        reduce_adder_tree(f, scratch)
    }
}

impl Classifier for KernelInferenceEngine {
    fn n_features(&self) -> usize {
        self.params.n_features()
    }

    fn format(&self) -> FixedPointFormat {
        self.params.format()
    }

    fn predict(&self, x: &[i32]) -> Result<Prediction> {
        let f = self.params.format();
        check_input(x, self.params.n_features(), f)?;

        let mut tally = OperationTally::new();
        let mut scratch = match self.accumulation {
            Accumulation::Sequential => Vec::new(),
            Accumulation::AdderTree => Vec::with_capacity(x.len()),
        };

        let mut acc = 0i32;
        for (sv, &alpha) in self.params.support_vectors().zip(self.params.dual_coef()) {
            let dist_sq = match self.accumulation {
                Accumulation::Sequential => self.distance_sequential(x, sv, &mut tally),
                Accumulation::AdderTree => {
                    self.distance_adder_tree(x, sv, &mut scratch, &mut tally)
                }
            };

            let k_val = self.lut.lookup(dist_sq);
            tally.count_lookup(1);

            let weighted = f.fixed_multiply(alpha, k_val);
            tally.count_multiply(1);

            acc = f.fixed_add(acc, weighted);
            tally.count_add(1);
        }

        let decision = f.fixed_add(acc, self.params.bias());
        tally.count_add(1);
        tally.count_compare(1);

        Ok(Prediction::from_decision(decision, tally))
    }
}
