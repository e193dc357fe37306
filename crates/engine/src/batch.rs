//! Parallel batch evaluation over a shared, read-only classifier
//!
//! Each sample gets its own tally; totals are summed after the parallel map.

use rayon::prelude::*;
use serde::Serialize;

use crate::classifier::{Classifier, Prediction};
use crate::error::Result;
use crate::tally::OperationTally;

/// Classify every sample, preserving input order.
///
/// Fails on the first invalid sample; no partial results are returned.
pub fn predict_batch<C, S>(engine: &C, samples: &[S]) -> Result<Vec<Prediction>>
where
    C: Classifier + ?Sized,
    S: AsRef<[i32]> + Sync,
{
    samples
        .par_iter()
        .map(|x| engine.predict(x.as_ref()))
        .collect()
}

/// Aggregate of one batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    #[serde(skip)]
    pub predictions: Vec<Prediction>,
    pub classes: Vec<u8>,
    pub total_tally: OperationTally,
    pub samples: usize,
}

impl BatchSummary {
    /// Mean primitive operations per sample
    pub fn mean_ops(&self) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.total_tally.total_ops() as f64 / self.samples as f64
    }

    /// Tally of a single call; every call on one model spends the same
    pub fn per_sample_tally(&self) -> Option<OperationTally> {
        self.predictions.first().map(|p| p.tally)
    }
}

/// Sum per-call tallies into a batch summary
pub fn summarize(predictions: Vec<Prediction>) -> BatchSummary {
    let total_tally: OperationTally = predictions.iter().map(|p| &p.tally).sum();
    let classes = predictions.iter().map(|p| p.class).collect();
    let samples = predictions.len();

    tracing::debug!(
        samples,
        total_ops = total_tally.total_ops(),
        "Batch complete"
    );

    BatchSummary {
        predictions,
        classes,
        total_tally,
        samples,
    }
}

/// `predict_batch` followed by `summarize`
pub fn run_batch<C, S>(engine: &C, samples: &[S]) -> Result<BatchSummary>
where
    C: Classifier + ?Sized,
    S: AsRef<[i32]> + Sync,
{
    Ok(summarize(predict_batch(engine, samples)?))
}
