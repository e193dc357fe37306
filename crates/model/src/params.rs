//! Validated, immutable model parameter records
//!
//! Both record types are checked once at construction: declared sizes must match
//! the actual array lengths and every value must lie inside the agreed format.
//! After that they are read-only for the lifetime of an engine.

use rand::Rng;
use svmsim_fixed_point::FixedPointFormat;

use crate::error::{ModelError, Result};

/// Check that every value is representable in `format`
pub(crate) fn check_range<I>(what: &str, values: I, format: FixedPointFormat) -> Result<()>
where
    I: IntoIterator<Item = i64>,
{
    for value in values {
        if !format.contains(value) {
            return Err(ModelError::ValueOutOfRange {
                what: what.to_string(),
                value,
                min: format.min_val(),
                max: format.max_val(),
            });
        }
    }
    Ok(())
}

fn check_len(what: &str, expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ModelError::DimensionMismatch {
            what: what.to_string(),
            expected,
            got,
        });
    }
    Ok(())
}

/// Linear classifier parameters: `decision = w · x + b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearModelParams {
    weights: Vec<i32>,
    bias: i32,
    format: FixedPointFormat,
}

impl LinearModelParams {
    /// Validate and wrap pre-quantized parameters
    pub fn new(
        weights: Vec<i32>,
        bias: i32,
        n_features: usize,
        format: FixedPointFormat,
    ) -> Result<Self> {
        check_len("weights", n_features, weights.len())?;
        if n_features == 0 {
            return Err(ModelError::Config("n_features must be at least 1".into()));
        }
        check_range("weights", weights.iter().map(|&w| w as i64), format)?;
        check_range("bias", [bias as i64], format)?;

        Ok(Self {
            weights,
            bias,
            format,
        })
    }

    /// Random parameters drawn uniformly from `[-limit, limit)` (for testing)
    pub fn random<R: Rng + ?Sized>(
        n_features: usize,
        limit: f64,
        format: FixedPointFormat,
        rng: &mut R,
    ) -> Result<Self> {
        let weights = (0..n_features)
            .map(|_| format.quantize(rng.gen_range(-limit..limit)))
            .collect();
        let bias = format.quantize(rng.gen_range(-limit..limit));
        Self::new(weights, bias, n_features, format)
    }

    pub fn weights(&self) -> &[i32] {
        &self.weights
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }
}

/// RBF-kernel classifier parameters:
/// `decision = Σ_j α_j · exp(-γ ‖x - sv_j‖²) + b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelModelParams {
    /// Support vectors, row-major `n_support × n_features`
    support_vectors: Vec<i32>,
    dual_coef: Vec<i32>,
    bias: i32,
    gamma: i32,
    n_support: usize,
    n_features: usize,
    format: FixedPointFormat,
}

impl KernelModelParams {
    /// Validate and wrap pre-quantized parameters.
    ///
    /// `support_vectors` must have exactly `n_support` rows of `n_features` values,
    /// and `dual_coef` exactly `n_support` entries.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        support_vectors: Vec<Vec<i32>>,
        dual_coef: Vec<i32>,
        bias: i32,
        gamma: i32,
        n_support: usize,
        n_features: usize,
        format: FixedPointFormat,
    ) -> Result<Self> {
        if n_support == 0 || n_features == 0 {
            return Err(ModelError::Config(format!(
                "n_support ({}) and n_features ({}) must be at least 1",
                n_support, n_features
            )));
        }
        check_len("support_vectors", n_support, support_vectors.len())?;
        check_len("dual_coef", n_support, dual_coef.len())?;

        for (j, row) in support_vectors.iter().enumerate() {
            check_len(&format!("support_vectors[{}]", j), n_features, row.len())?;
            check_range(
                &format!("support_vectors[{}]", j),
                row.iter().map(|&v| v as i64),
                format,
            )?;
        }
        // rows are checked, so this allocates n_support * n_features exactly
        let flat = support_vectors.concat();
        check_range("dual_coef", dual_coef.iter().map(|&a| a as i64), format)?;
        check_range("bias", [bias as i64], format)?;
        check_range("gamma", [gamma as i64], format)?;

        Ok(Self {
            support_vectors: flat,
            dual_coef,
            bias,
            gamma,
            n_support,
            n_features,
            format,
        })
    }

    /// Random parameters (for testing).
    ///
    /// Support vectors are drawn from `[-feature_limit, feature_limit)`, dual
    /// coefficients and bias from `[-coef_limit, coef_limit)`.
    pub fn random<R: Rng + ?Sized>(
        n_support: usize,
        n_features: usize,
        gamma: f64,
        feature_limit: f64,
        coef_limit: f64,
        format: FixedPointFormat,
        rng: &mut R,
    ) -> Result<Self> {
        let support_vectors = (0..n_support)
            .map(|_| {
                (0..n_features)
                    .map(|_| format.quantize(rng.gen_range(-feature_limit..feature_limit)))
                    .collect()
            })
            .collect();
        let dual_coef = (0..n_support)
            .map(|_| format.quantize(rng.gen_range(-coef_limit..coef_limit)))
            .collect();
        let bias = format.quantize(rng.gen_range(-coef_limit..coef_limit));

        Self::new(
            support_vectors,
            dual_coef,
            bias,
            format.quantize(gamma),
            n_support,
            n_features,
            format,
        )
    }

    /// Support vector `j`, or `None` past the last one
    pub fn support_vector(&self, j: usize) -> Option<&[i32]> {
        self.support_vectors.chunks_exact(self.n_features).nth(j)
    }

    /// Iterate support vectors in array order
    pub fn support_vectors(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.support_vectors.chunks_exact(self.n_features)
    }

    pub fn dual_coef(&self) -> &[i32] {
        &self.dual_coef
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    pub fn gamma(&self) -> i32 {
        self.gamma
    }

    pub fn n_support(&self) -> usize {
        self.n_support
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }
}
