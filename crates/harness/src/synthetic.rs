//! Seeded synthetic two-cluster problems for demos and tests
//!
//! Class 1 samples scatter around `+separation` on every feature and class 0
//! around `-separation`. The linear model averages the features; the kernel
//! model places support vectors on both clusters with opposite-sign weights.

use rand::Rng;
use svmsim_fixed_point::{FixedPointFormat, FixedVector};
use svmsim_model::{KernelModelParams, LinearModelParams, TestVectors};

use crate::error::{HarnessError, Result};

/// Shape of a synthetic problem, in real units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticConfig {
    pub n_features: usize,
    pub n_support: usize,
    pub n_samples: usize,
    /// Distance of each cluster center from the origin on every feature
    pub separation: f64,
    /// Half-width of the uniform noise around a center
    pub spread: f64,
    pub gamma: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_features: 16,
            n_support: 16,
            n_samples: 1000,
            separation: 0.5,
            spread: 0.5,
            gamma: 0.25,
        }
    }
}

/// Quantized models and labelled samples drawn from one configuration
#[derive(Debug, Clone)]
pub struct SyntheticProblem {
    pub linear: LinearModelParams,
    pub kernel: KernelModelParams,
    pub vectors: TestVectors,
}

fn cluster_point<R: Rng + ?Sized>(
    rng: &mut R,
    label: u8,
    config: &SyntheticConfig,
    format: FixedPointFormat,
) -> Vec<i32> {
    let center = if label == 1 {
        config.separation
    } else {
        -config.separation
    };
    let reals: Vec<f64> = (0..config.n_features)
        .map(|_| center + rng.gen_range(-config.spread..=config.spread))
        .collect();
    FixedVector::from_f64_slice(&reals, format).data
}

/// Draw a problem from `rng`
pub fn generate<R: Rng + ?Sized>(
    config: &SyntheticConfig,
    format: FixedPointFormat,
    rng: &mut R,
) -> Result<SyntheticProblem> {
    if config.n_features == 0 || config.n_support == 0 {
        return Err(HarnessError::InvalidInput(
            "synthetic problem needs at least one feature and one support vector".to_string(),
        ));
    }
    if !(config.spread >= 0.0 && config.spread.is_finite()) {
        return Err(HarnessError::InvalidInput(format!(
            "spread ({}) must be finite and non-negative",
            config.spread
        )));
    }

    let weight = format.quantize(1.0 / config.n_features as f64);
    let linear = LinearModelParams::new(
        vec![weight; config.n_features],
        0,
        config.n_features,
        format,
    )?;

    // alternate clusters so every model has both signs
    let svs: Vec<Vec<i32>> = (0..config.n_support)
        .map(|j| cluster_point(rng, u8::from(j % 2 == 0), config, format))
        .collect();
    let alpha = format.quantize(1.0);
    let dual_coef = (0..config.n_support)
        .map(|j| if j % 2 == 0 { alpha } else { -alpha })
        .collect();
    let kernel = KernelModelParams::new(
        svs,
        dual_coef,
        0,
        format.quantize(config.gamma),
        config.n_support,
        config.n_features,
        format,
    )?;

    let mut samples = Vec::with_capacity(config.n_samples);
    let mut labels = Vec::with_capacity(config.n_samples);
    for _ in 0..config.n_samples {
        let label = u8::from(rng.gen_bool(0.5));
        samples.push(cluster_point(rng, label, config, format));
        labels.push(label);
    }
    let vectors = TestVectors::new(samples, labels)?;

    tracing::debug!(
        n_features = config.n_features,
        n_support = config.n_support,
        n_samples = config.n_samples,
        "Generated synthetic problem"
    );

    Ok(SyntheticProblem {
        linear,
        kernel,
        vectors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_generate_shapes() {
        let config = SyntheticConfig {
            n_samples: 64,
            ..Default::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let p = generate(&config, FixedPointFormat::q8_8(), &mut rng).unwrap();
        assert_eq!(p.linear.n_features(), 16);
        // 1/16 in Q8.8
        assert!(p.linear.weights().iter().all(|&w| w == 16));
        assert_eq!(p.kernel.n_support(), 16);
        assert_eq!(p.kernel.gamma(), 64);
        assert_eq!(p.vectors.len(), 64);
        assert_eq!(p.vectors.n_features(), Some(16));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = SyntheticConfig {
            n_samples: 32,
            ..Default::default()
        };
        let q = FixedPointFormat::q8_8();
        let a = generate(&config, q, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
        let b = generate(&config, q, &mut ChaCha20Rng::seed_from_u64(9)).unwrap();
        assert_eq!(a.kernel, b.kernel);
        assert_eq!(a.vectors, b.vectors);
    }

    #[test]
    fn test_generate_rejects_empty_shape() {
        let config = SyntheticConfig {
            n_support: 0,
            ..Default::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert!(generate(&config, FixedPointFormat::q8_8(), &mut rng).is_err());
    }
}
