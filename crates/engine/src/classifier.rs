//! Common interface of the fixed-point classifiers

use svmsim_fixed_point::FixedPointFormat;

use crate::error::{EngineError, Result};
use crate::tally::OperationTally;

/// Result of one inference call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    /// 1 if `decision >= 0`, else 0
    pub class: u8,
    /// Quantized decision value after the bias add
    pub decision: i32,
    /// Operations spent by this call alone
    pub tally: OperationTally,
}

impl Prediction {
    pub(crate) fn from_decision(decision: i32, tally: OperationTally) -> Self {
        Self {
            class: u8::from(decision >= 0),
            decision,
            tally,
        }
    }
}

/// A binary classifier evaluated in fixed-point arithmetic.
///
/// Implementations are immutable after construction and can be shared across
/// threads; every call owns its tally.
pub trait Classifier: Send + Sync {
    /// Expected input width
    fn n_features(&self) -> usize;

    /// Format of inputs, parameters and results
    fn format(&self) -> FixedPointFormat;

    /// Classify one quantized feature vector
    fn predict(&self, x: &[i32]) -> Result<Prediction>;
}

/// Reject inputs of the wrong width or with values outside the format
pub(crate) fn check_input(x: &[i32], n_features: usize, format: FixedPointFormat) -> Result<()> {
    if x.len() != n_features {
        return Err(EngineError::DimensionMismatch {
            expected: n_features,
            got: x.len(),
        });
    }
    if let Some((index, &value)) = x
        .iter()
        .enumerate()
        .find(|&(_, &v)| !format.contains(v as i64))
    {
        return Err(EngineError::ValueOutOfRange {
            index,
            value,
            min: format.min_val(),
            max: format.max_val(),
        });
    }
    Ok(())
}
