//! Labelled test vectors

use crate::error::{ModelError, Result};

/// Ordered, already-quantized feature vectors paired with binary labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVectors {
    samples: Vec<Vec<i32>>,
    labels: Vec<u8>,
}

impl TestVectors {
    /// Pair samples with labels. Lengths must match, rows must share one width,
    /// and labels must be 0 or 1.
    pub fn new(samples: Vec<Vec<i32>>, labels: Vec<u8>) -> Result<Self> {
        if samples.len() != labels.len() {
            return Err(ModelError::DimensionMismatch {
                what: "y_test".into(),
                expected: samples.len(),
                got: labels.len(),
            });
        }
        if let Some(first) = samples.first() {
            for (i, row) in samples.iter().enumerate() {
                if row.len() != first.len() {
                    return Err(ModelError::DimensionMismatch {
                        what: format!("X_test[{}]", i),
                        expected: first.len(),
                        got: row.len(),
                    });
                }
            }
        }
        if let Some((index, &value)) = labels.iter().enumerate().find(|&(_, &l)| l > 1) {
            return Err(ModelError::InvalidLabel {
                index,
                value: value as i64,
            });
        }
        Ok(Self { samples, labels })
    }

    pub fn samples(&self) -> &[Vec<i32>] {
        &self.samples
    }

    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature width, or `None` when there are no samples
    pub fn n_features(&self) -> Option<usize> {
        self.samples.first().map(Vec::len)
    }

    /// Iterate `(sample, label)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&[i32], u8)> + '_ {
        self.samples
            .iter()
            .map(Vec::as_slice)
            .zip(self.labels.iter().copied())
    }
}
