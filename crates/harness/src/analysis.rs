//! Monte Carlo study of RBF kernel error under quantization
//!
//! Draws standard-normal input and support-vector pairs, computes the squared
//! distance on the fixed-point data path (saturating subtract, floor-shift
//! square, saturating add) and compares `exp(-gamma * d_q)` against the exact
//! `exp(-gamma * d)`. The floor shift biases `d_q` low, so the mean error is
//! expected to be positive.

use std::fmt;

use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;
use svmsim_fixed_point::{FixedPointFormat, FixedVector};

use crate::error::{HarnessError, Result};

/// Error statistics of the quantized kernel value `exp_q - exp_true`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KernelNoise {
    pub trials: usize,
    pub mean_error: f64,
    /// Population standard deviation
    pub std_error: f64,
    pub max_abs_error: f64,
    /// `max_abs_error` in units of the format's least significant bit
    pub max_abs_error_lsb: f64,
}

impl fmt::Display for KernelNoise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kernel noise ({} trials)", self.trials)?;
        writeln!(f, "  mean error:    {:+.6}", self.mean_error)?;
        writeln!(f, "  std error:     {:.6}", self.std_error)?;
        write!(
            f,
            "  max |error|:   {:.6} ({:.2} LSB)",
            self.max_abs_error, self.max_abs_error_lsb
        )
    }
}

/// Squared distance as the kernel engine's sequential path computes it
fn fixed_distance_sq(x: &FixedVector, sv: &FixedVector) -> i32 {
    let f = x.format;
    x.data.iter().zip(&sv.data).fold(0i32, |acc, (&a, &b)| {
        let d = f.fixed_sub(a, b);
        f.fixed_add(acc, f.fixed_multiply(d, d))
    })
}

/// Run `trials` independent draws with `n_features` features each
pub fn kernel_noise<R: Rng + ?Sized>(
    format: FixedPointFormat,
    gamma: f64,
    n_features: usize,
    trials: usize,
    rng: &mut R,
) -> Result<KernelNoise> {
    if n_features == 0 || trials == 0 {
        return Err(HarnessError::InvalidInput(format!(
            "noise analysis needs at least one feature and one trial (got {} and {})",
            n_features, trials
        )));
    }
    if !gamma.is_finite() {
        return Err(HarnessError::InvalidInput(format!(
            "gamma ({}) must be finite",
            gamma
        )));
    }

    let mut errors = Vec::with_capacity(trials);
    for _ in 0..trials {
        let x: Vec<f64> = (0..n_features).map(|_| rng.sample(StandardNormal)).collect();
        let sv: Vec<f64> = (0..n_features).map(|_| rng.sample(StandardNormal)).collect();

        let dist_true: f64 = x.iter().zip(&sv).map(|(a, b)| (a - b) * (a - b)).sum();
        let exp_true = (-gamma * dist_true).exp();

        let xq = FixedVector::from_f64_slice(&x, format);
        let svq = FixedVector::from_f64_slice(&sv, format);
        let dist_q = format.dequantize(fixed_distance_sq(&xq, &svq));
        let exp_q = (-gamma * dist_q).exp();

        errors.push(exp_q - exp_true);
    }

    let n = errors.len() as f64;
    let mean_error = errors.iter().sum::<f64>() / n;
    let variance = errors.iter().map(|e| (e - mean_error).powi(2)).sum::<f64>() / n;
    let max_abs_error = errors.iter().map(|e| e.abs()).fold(0.0f64, f64::max);

    let noise = KernelNoise {
        trials,
        mean_error,
        std_error: variance.sqrt(),
        max_abs_error,
        max_abs_error_lsb: max_abs_error / format.resolution(),
    };

    tracing::info!(
        trials,
        n_features,
        gamma,
        mean = noise.mean_error,
        std = noise.std_error,
        max = noise.max_abs_error,
        "Kernel noise analysis complete"
    );

    Ok(noise)
}
