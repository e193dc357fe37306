//! Floating-point evaluation of the same decision functions
//!
//! Parameters are dequantized once; inputs are dequantized per call. Used as
//! the ground truth that the fixed-point engines are compared against.

use svmsim_fixed_point::{FixedPointFormat, FixedVector};
use svmsim_model::{KernelModelParams, LinearModelParams};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq)]
enum FloatModel {
    Linear {
        weights: Vec<f64>,
        bias: f64,
    },
    Kernel {
        support_vectors: Vec<Vec<f64>>,
        dual_coef: Vec<f64>,
        bias: f64,
        gamma: f64,
    },
}

/// `f64` decision function built from quantized parameters
#[derive(Debug, Clone, PartialEq)]
pub struct FloatReference {
    model: FloatModel,
    n_features: usize,
    format: FixedPointFormat,
}

impl FloatReference {
    /// `Σ w_i x_i + b`
    pub fn linear(params: &LinearModelParams) -> Self {
        let f = params.format();
        Self {
            model: FloatModel::Linear {
                weights: params.weights().iter().map(|&w| f.dequantize(w)).collect(),
                bias: f.dequantize(params.bias()),
            },
            n_features: params.n_features(),
            format: f,
        }
    }

    /// `Σ_j α_j exp(-γ ||x - sv_j||²) + b`
    pub fn kernel(params: &KernelModelParams) -> Self {
        let f = params.format();
        Self {
            model: FloatModel::Kernel {
                support_vectors: params
                    .support_vectors()
                    .map(|sv| sv.iter().map(|&v| f.dequantize(v)).collect())
                    .collect(),
                dual_coef: params.dual_coef().iter().map(|&a| f.dequantize(a)).collect(),
                bias: f.dequantize(params.bias()),
                gamma: f.dequantize(params.gamma()),
            },
            n_features: params.n_features(),
            format: f,
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    /// Decision value for a real-valued input
    pub fn decision_f64(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.n_features {
            return Err(EngineError::DimensionMismatch {
                expected: self.n_features,
                got: x.len(),
            });
        }

        let value = match &self.model {
            FloatModel::Linear { weights, bias } => {
                weights.iter().zip(x).map(|(w, xi)| w * xi).sum::<f64>() + bias
            }
            FloatModel::Kernel {
                support_vectors,
                dual_coef,
                bias,
                gamma,
            } => {
                support_vectors
                    .iter()
                    .zip(dual_coef)
                    .map(|(sv, alpha)| {
                        let dist_sq: f64 = sv.iter().zip(x).map(|(s, xi)| (xi - s).powi(2)).sum();
                        alpha * (-gamma * dist_sq).exp()
                    })
                    .sum::<f64>()
                    + bias
            }
        };
        Ok(value)
    }

    /// Decision value for a quantized input
    pub fn decision(&self, x: &[i32]) -> Result<f64> {
        let real = FixedVector::from_raw(x.to_vec(), self.format)?.to_f64_vec();
        self.decision_f64(&real)
    }

    /// 1 if the decision is non-negative, else 0
    pub fn classify(&self, x: &[i32]) -> Result<u8> {
        Ok(u8::from(self.decision(x)? >= 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::kernel::KernelInferenceEngine;
    use crate::linear::LinearInferenceEngine;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use svmsim_model::LutConfig;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    #[test]
    fn test_linear_reference_value() {
        let params = LinearModelParams::new(vec![128, 64], 384, 2, Q).unwrap();
        let r = FloatReference::linear(&params);
        // 0.5*2.0 + 0.25*(-4.0) + 1.5
        assert!((r.decision(&[512, -1024]).unwrap() - 1.5).abs() < 1e-12);
        assert_eq!(r.classify(&[512, -1024]).unwrap(), 1);
    }

    #[test]
    fn test_kernel_reference_value() {
        // gamma 0.5, one SV at origin, x = [1.0, 1.0] -> exp(-1.0)
        let params = KernelModelParams::new(vec![vec![0, 0]], vec![256], 0, 128, 1, 2, Q).unwrap();
        let r = FloatReference::kernel(&params);
        let d = r.decision(&[256, 256]).unwrap();
        assert!((d - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let params = LinearModelParams::new(vec![1, 2], 0, 2, Q).unwrap();
        let r = FloatReference::linear(&params);
        assert!(matches!(
            r.decision(&[1]),
            Err(EngineError::DimensionMismatch { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_out_of_format_input_rejected() {
        let params = LinearModelParams::new(vec![1], 0, 1, Q).unwrap();
        let r = FloatReference::linear(&params);
        assert!(matches!(r.decision(&[40_000]), Err(EngineError::FixedPoint(_))));
    }

    #[test]
    fn test_linear_engine_tracks_reference() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let params = LinearModelParams::random(8, 1.0, Q, &mut rng).unwrap();
        let engine = LinearInferenceEngine::new(params.clone());
        let reference = FloatReference::linear(&params);

        for _ in 0..200 {
            let x: Vec<i32> = (0..8).map(|_| rng.gen_range(-512..=512)).collect();
            let fixed = Q.dequantize(engine.predict(&x).unwrap().decision);
            let float = reference.decision(&x).unwrap();
            // each truncated product loses < 1 LSB
            assert!((fixed - float).abs() <= 9.0 / 256.0, "fixed={} float={}", fixed, float);
        }
    }

    #[test]
    fn test_kernel_class_matches_reference_inside_noise_floor() {
        // two well-separated clusters of support vectors: +1.0 at +2.0, -1.0 at -2.0
        let n_features = 4;
        let svs = vec![vec![512; n_features], vec![-512; n_features]];
        let params =
            KernelModelParams::new(svs, vec![256, -256], 0, 64, 2, n_features, Q).unwrap();
        let engine = KernelInferenceEngine::new(
            params.clone(),
            LutConfig {
                size: 256,
                domain_max_distance: 16.0,
            },
        )
        .unwrap();
        let reference = FloatReference::kernel(&params);

        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for i in 0..500 {
            let center = if i % 2 == 0 { 512 } else { -512 };
            let x: Vec<i32> = (0..n_features)
                .map(|_| center + rng.gen_range(-64..=64))
                .collect();

            let fixed = engine.predict(&x).unwrap();
            let float = reference.decision(&x).unwrap();
            assert_eq!(fixed.class, reference.classify(&x).unwrap(), "x={:?}", x);
            assert_eq!(fixed.class, u8::from(center > 0));
            assert!(
                (Q.dequantize(fixed.decision) - float).abs() < 0.1,
                "fixed={} float={}",
                fixed.decision,
                float
            );
        }
    }
}
