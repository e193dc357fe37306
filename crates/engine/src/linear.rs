//! Fixed-point linear classifier: `w · x + b`

use svmsim_fixed_point::FixedPointFormat;
use svmsim_model::{Accumulation, LinearModelParams};

use crate::accumulate::{adder_tree_adds, reduce_adder_tree};
use crate::classifier::{check_input, Classifier, Prediction};
use crate::error::Result;
use crate::tally::OperationTally;

/// Linear classifier over validated, immutable parameters
#[derive(Debug, Clone)]
pub struct LinearInferenceEngine {
    params: LinearModelParams,
    accumulation: Accumulation,
}

impl LinearInferenceEngine {
    /// Engine using the sequential MAC fold
    pub fn new(params: LinearModelParams) -> Self {
        Self::with_accumulation(params, Accumulation::Sequential)
    }

    pub fn with_accumulation(params: LinearModelParams, accumulation: Accumulation) -> Self {
        tracing::debug!(
            n_features = params.n_features(),
            %accumulation,
            "Created linear inference engine"
        );
        Self {
            params,
            accumulation,
        }
    }

    pub fn params(&self) -> &LinearModelParams {
        &self.params
    }

    pub fn accumulation(&self) -> Accumulation {
        self.accumulation
    }

    /// `acc = add(acc, mul(w[i], x[i]))` for `i` in index order
    fn dot_sequential(&self, x: &[i32], tally: &mut OperationTally) -> i32 {
        let f = self.params.format();
        let acc = self
            .params
            .weights()
            .iter()
            .zip(x)
            .fold(0i32, |acc, (&w, &xi)| f.fixed_add(acc, f.fixed_multiply(w, xi)));
        tally.count_mac(x.len() as u64);
        acc
    }

    /// All products first, then a balanced adder tree
    fn dot_adder_tree(&self, x: &[i32], tally: &mut OperationTally) -> i32 {
        let f = self.params.format();
        let mut products: Vec<i32> = self
            .params
            .weights()
            .iter()
            .zip(x)
            .map(|(&w, &xi)| f.fixed_multiply(w, xi))
            .collect();
        tally.count_multiply(products.len() as u64);
        tally.count_add(adder_tree_adds(products.len()));
        reduce_adder_tree(f, &mut products)
    }
}

impl Classifier for LinearInferenceEngine {
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
        let acc = match self.accumulation {
            Accumulation::Sequential => self.dot_sequential(x, &mut tally),
            Accumulation::AdderTree => self.dot_adder_tree(x, &mut tally),
        };

        let decision = f.fixed_add(acc, self.params.bias());
        tally.count_add(1);
        tally.count_compare(1);

        Ok(Prediction::from_decision(decision, tally))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    fn engine(weights: Vec<i32>, bias: i32) -> LinearInferenceEngine {
        let n = weights.len();
        LinearInferenceEngine::new(LinearModelParams::new(weights, bias, n, Q).unwrap())
    }

    #[test]
    fn test_boundary_decision_is_class_one() {
        // [1.0, -1.0] . [1.0, 1.0] + 0 = 0 -> class 1
        let e = engine(vec![256, -256], 0);
        let p = e.predict(&[256, 256]).unwrap();
        assert_eq!(p.decision, 0);
        assert_eq!(p.class, 1);
    }

    #[test]
    fn test_negative_decision_is_class_zero() {
        let e = engine(vec![256, -256], -1);
        let p = e.predict(&[256, 256]).unwrap();
        assert_eq!(p.decision, -1);
        assert_eq!(p.class, 0);
    }

    #[test]
    fn test_decision_value() {
        // 0.5*2.0 + 0.25*(-4.0) + 1.5 = 1.5
        let e = engine(vec![128, 64], 384);
        let p = e.predict(&[512, -1024]).unwrap();
        assert_eq!(p.decision, 384);
    }

    #[test]
    fn test_tally_independent_of_values() {
        let e = engine(vec![100, -200, 300, -400, 500], 7);
        for x in [[0, 0, 0, 0, 0], [32767, -32768, 1, -1, 12345]] {
            let t = e.predict(&x).unwrap().tally;
            assert_eq!(t.multiply_accumulate, 5);
            assert_eq!(t.add, 1);
            assert_eq!(t.compare, 1);
            assert_eq!(t.multiply, 0);
            assert_eq!(t.lookup, 0);
        }
    }

    #[test]
    fn test_saturation_follows_fold_order() {
        // products: 100.0, 100.0, -100.0 (each 25600 raw)
        // fold: 25600 -> 32767 (sat) -> 7167
        let e = engine(vec![2560, 2560, -2560], 0);
        let p = e.predict(&[2560, 2560, 2560]).unwrap();
        assert_eq!(p.decision, 7167);
    }

    #[test]
    fn test_adder_tree_variant() {
        let params = LinearModelParams::new(vec![2560, 2560, -2560, -2560], 0, 4, Q).unwrap();
        let seq = LinearInferenceEngine::new(params.clone());
        let tree = LinearInferenceEngine::with_accumulation(params, Accumulation::AdderTree);
        let x = [2560; 4];

        // fold: 32767 after two terms, then 7167, then -18433
        assert_eq!(seq.predict(&x).unwrap().decision, -18433);
        // tree: (32767) + (-32768) = -1
        let p = tree.predict(&x).unwrap();
        assert_eq!(p.decision, -1);
        assert_eq!(p.class, 0);
        assert_eq!(p.tally.multiply, 4);
        assert_eq!(p.tally.add, 3 + 1);
        assert_eq!(p.tally.compare, 1);
        assert_eq!(p.tally.multiply_accumulate, 0);
    }

    #[test]
    fn test_variants_agree_without_saturation() {
        let params = LinearModelParams::new(vec![10, -20, 30, -40, 50], 3, 5, Q).unwrap();
        let seq = LinearInferenceEngine::new(params.clone());
        let tree = LinearInferenceEngine::with_accumulation(params, Accumulation::AdderTree);
        let x = [256, 512, -768, 1024, 2048];
        assert_eq!(
            seq.predict(&x).unwrap().decision,
            tree.predict(&x).unwrap().decision
        );
    }

    #[test]
    fn test_sequential_fold_matches_vector_dot() {
        use svmsim_fixed_point::FixedVector;

        let weights = vec![2560, -700, 31000, 12, -32768];
        let x = vec![2560, 4000, 300, -9, 128];
        let e = engine(weights.clone(), 0);
        let w = FixedVector::from_raw(weights, Q).unwrap();
        let v = FixedVector::from_raw(x.clone(), Q).unwrap();
        assert_eq!(e.predict(&x).unwrap().decision, w.dot(&v).unwrap());
    }

    #[test]
    fn test_dimension_mismatch() {
        let e = engine(vec![1, 2, 3], 0);
        assert!(matches!(
            e.predict(&[1, 2]),
            Err(EngineError::DimensionMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_input_out_of_range() {
        let e = engine(vec![1, 2], 0);
        assert!(matches!(
            e.predict(&[1, 40_000]),
            Err(EngineError::ValueOutOfRange { index: 1, .. })
        ));
    }
}
