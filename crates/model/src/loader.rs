//! JSON parameter records from the external quantization stage
//!
//! Records are read unmodified and validated against the configured format.
//! The optional `format` label a record may carry is only cross-checked, never
//! used to choose the format.

use std::path::Path;

use serde::{Deserialize, Serialize};
use svmsim_fixed_point::FixedPointFormat;

use crate::error::{ModelError, Result};
use crate::params::{check_range, KernelModelParams, LinearModelParams};
use crate::vectors::TestVectors;

/// Linear record: `{weights, bias, n_features, format?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearParamsRecord {
    pub weights: Vec<i64>,
    pub bias: i64,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Dual coefficients as written by the quantization stage: either flat, or the
/// single-row matrix shape `[[...]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DualCoefRecord {
    Flat(Vec<i64>),
    Nested(Vec<Vec<i64>>),
}

impl DualCoefRecord {
    fn into_flat(self) -> Result<Vec<i64>> {
        match self {
            Self::Flat(v) => Ok(v),
            Self::Nested(mut rows) => {
                if rows.len() != 1 {
                    return Err(ModelError::DimensionMismatch {
                        what: "dual_coef rows".into(),
                        expected: 1,
                        got: rows.len(),
                    });
                }
                Ok(rows.remove(0))
            }
        }
    }
}

/// Kernel record: `{support_vectors, dual_coef, bias, gamma, n_support, n_features, format?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelParamsRecord {
    pub support_vectors: Vec<Vec<i64>>,
    pub dual_coef: DualCoefRecord,
    pub bias: i64,
    pub gamma: i64,
    pub n_support: usize,
    pub n_features: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Test vectors: `{X_test, y_test}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestVectorsRecord {
    #[serde(rename = "X_test")]
    pub samples: Vec<Vec<i64>>,
    #[serde(rename = "y_test")]
    pub labels: Vec<i64>,
}

impl From<&LinearModelParams> for LinearParamsRecord {
    fn from(params: &LinearModelParams) -> Self {
        Self {
            weights: params.weights().iter().map(|&w| w as i64).collect(),
            bias: params.bias() as i64,
            n_features: params.n_features(),
            format: Some(params.format().to_string()),
        }
    }
}

impl From<&KernelModelParams> for KernelParamsRecord {
    fn from(params: &KernelModelParams) -> Self {
        Self {
            support_vectors: params
                .support_vectors()
                .map(|sv| sv.iter().map(|&v| v as i64).collect())
                .collect(),
            dual_coef: DualCoefRecord::Flat(
                params.dual_coef().iter().map(|&a| a as i64).collect(),
            ),
            bias: params.bias() as i64,
            gamma: params.gamma() as i64,
            n_support: params.n_support(),
            n_features: params.n_features(),
            format: Some(params.format().to_string()),
        }
    }
}

impl From<&TestVectors> for TestVectorsRecord {
    fn from(vectors: &TestVectors) -> Self {
        Self {
            samples: vectors
                .samples()
                .iter()
                .map(|x| x.iter().map(|&v| v as i64).collect())
                .collect(),
            labels: vectors.labels().iter().map(|&l| l as i64).collect(),
        }
    }
}

/// Narrow wide record values into the format, reporting the first violation
fn narrow(what: &str, values: &[i64], format: FixedPointFormat) -> Result<Vec<i32>> {
    check_range(what, values.iter().copied(), format)?;
    Ok(values.iter().map(|&v| v as i32).collect())
}

fn narrow_scalar(what: &str, value: i64, format: FixedPointFormat) -> Result<i32> {
    check_range(what, [value], format)?;
    Ok(value as i32)
}

/// Loads and validates parameter records for one configured format
#[derive(Debug, Clone, Copy)]
pub struct ParameterLoader {
    format: FixedPointFormat,
}

impl ParameterLoader {
    pub fn new(format: FixedPointFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }

    fn check_declared_format(&self, declared: Option<&str>) -> Result<()> {
        let Some(label) = declared else {
            return Ok(());
        };
        let parsed: FixedPointFormat = label.parse()?;
        if parsed != self.format {
            return Err(ModelError::FormatMismatch {
                declared: label.to_string(),
                configured: self.format.to_string(),
            });
        }
        Ok(())
    }

    /// Validate a linear record
    pub fn linear_from_record(&self, record: LinearParamsRecord) -> Result<LinearModelParams> {
        self.check_declared_format(record.format.as_deref())?;
        let weights = narrow("weights", &record.weights, self.format)?;
        let bias = narrow_scalar("bias", record.bias, self.format)?;
        let params = LinearModelParams::new(weights, bias, record.n_features, self.format)?;

        tracing::info!(
            n_features = params.n_features(),
            format = %self.format,
            "Loaded linear parameters"
        );
        Ok(params)
    }

    pub fn linear_from_str(&self, json: &str) -> Result<LinearModelParams> {
        self.linear_from_record(serde_json::from_str(json)?)
    }

    pub fn linear_from_file<P: AsRef<Path>>(&self, path: P) -> Result<LinearModelParams> {
        let content = std::fs::read_to_string(path)?;
        self.linear_from_str(&content)
    }

    /// Validate a kernel record
    pub fn kernel_from_record(&self, record: KernelParamsRecord) -> Result<KernelModelParams> {
        self.check_declared_format(record.format.as_deref())?;

        let support_vectors = record
            .support_vectors
            .iter()
            .enumerate()
            .map(|(j, row)| narrow(&format!("support_vectors[{}]", j), row, self.format))
            .collect::<Result<Vec<_>>>()?;
        let dual_coef = narrow("dual_coef", &record.dual_coef.into_flat()?, self.format)?;
        let bias = narrow_scalar("bias", record.bias, self.format)?;
        let gamma = narrow_scalar("gamma", record.gamma, self.format)?;

        let params = KernelModelParams::new(
            support_vectors,
            dual_coef,
            bias,
            gamma,
            record.n_support,
            record.n_features,
            self.format,
        )?;

        tracing::info!(
            n_support = params.n_support(),
            n_features = params.n_features(),
            gamma = params.gamma(),
            format = %self.format,
            "Loaded kernel parameters"
        );
        Ok(params)
    }

    pub fn kernel_from_str(&self, json: &str) -> Result<KernelModelParams> {
        self.kernel_from_record(serde_json::from_str(json)?)
    }

    pub fn kernel_from_file<P: AsRef<Path>>(&self, path: P) -> Result<KernelModelParams> {
        let content = std::fs::read_to_string(path)?;
        self.kernel_from_str(&content)
    }

    /// Validate a test-vector record
    pub fn test_vectors_from_record(&self, record: TestVectorsRecord) -> Result<TestVectors> {
        let samples = record
            .samples
            .iter()
            .enumerate()
            .map(|(i, row)| narrow(&format!("X_test[{}]", i), row, self.format))
            .collect::<Result<Vec<_>>>()?;
        let labels = record
            .labels
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 | 1 => Ok(value as u8),
                _ => Err(ModelError::InvalidLabel { index, value }),
            })
            .collect::<Result<Vec<_>>>()?;

        TestVectors::new(samples, labels)
    }

    pub fn test_vectors_from_str(&self, json: &str) -> Result<TestVectors> {
        self.test_vectors_from_record(serde_json::from_str(json)?)
    }

    pub fn test_vectors_from_file<P: AsRef<Path>>(&self, path: P) -> Result<TestVectors> {
        let content = std::fs::read_to_string(path)?;
        self.test_vectors_from_str(&content)
    }
}
