//! Fixed-point vs floating-point evaluation over a labelled test set

use std::fmt;

use serde::Serialize;
use svmsim_engine::{run_batch, Classifier, FloatReference, OperationTally};
use svmsim_model::TestVectors;

use crate::error::{HarnessError, Result};

/// Binary confusion matrix; rows are true labels, columns predictions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(labels: &[u8], predictions: &[u8]) -> Self {
        labels
            .iter()
            .zip(predictions)
            .fold(Self::default(), |mut m, (&label, &pred)| {
                match (label, pred) {
                    (0, 0) => m.true_negative += 1,
                    (0, _) => m.false_positive += 1,
                    (_, 0) => m.false_negative += 1,
                    _ => m.true_positive += 1,
                }
                m
            })
    }

    /// `[[tn, fp], [fn, tp]]`
    pub fn as_array(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn correct(&self) -> usize {
        self.true_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total()).unwrap_or(0.0)
    }

    pub fn precision(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "            pred 0  pred 1")?;
        writeln!(
            f,
            "  true 0  {:>7} {:>7}",
            self.true_negative, self.false_positive
        )?;
        write!(
            f,
            "  true 1  {:>7} {:>7}",
            self.false_negative, self.true_positive
        )
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    (den > 0).then(|| num as f64 / den as f64)
}

/// Result of running a fixed-point engine and its float reference over a test set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub samples: usize,
    /// Fraction of fixed-point classes matching the labels
    pub fixed_accuracy: f64,
    /// Fraction of float-reference classes matching the labels
    pub float_accuracy: f64,
    /// `fixed_accuracy - float_accuracy`
    pub accuracy_delta: f64,
    /// Fraction of samples where fixed and float classes agree
    pub agreement: f64,
    /// Largest `|fixed - float|` decision difference, in real units
    pub max_decision_error: f64,
    pub confusion: ConfusionMatrix,
    pub total_tally: OperationTally,
    /// Tally of one call; identical for every sample of a model
    pub per_sample_tally: OperationTally,
    pub mean_ops: f64,
}

impl Evaluation {
    pub fn run<C>(engine: &C, reference: &FloatReference, vectors: &TestVectors) -> Result<Self>
    where
        C: Classifier + ?Sized,
    {
        if vectors.is_empty() {
            return Err(HarnessError::InvalidInput("no test vectors".to_string()));
        }
        if let Some(n) = vectors.n_features() {
            if n != engine.n_features() {
                return Err(HarnessError::InvalidInput(format!(
                    "test vectors have {} features, model expects {}",
                    n,
                    engine.n_features()
                )));
            }
        }

        let summary = run_batch(engine, vectors.samples())?;

        let format = engine.format();
        let mut float_classes = Vec::with_capacity(vectors.len());
        let mut max_decision_error = 0.0f64;
        for (x, prediction) in vectors.samples().iter().zip(&summary.predictions) {
            let decision = reference.decision(x)?;
            float_classes.push(u8::from(decision >= 0.0));
            let err = (format.dequantize(prediction.decision) - decision).abs();
            max_decision_error = max_decision_error.max(err);
        }

        let labels = vectors.labels();
        let confusion = ConfusionMatrix::from_predictions(labels, &summary.classes);
        let float_confusion = ConfusionMatrix::from_predictions(labels, &float_classes);
        let agreeing = summary
            .classes
            .iter()
            .zip(&float_classes)
            .filter(|(a, b)| a == b)
            .count();

        let fixed_accuracy = confusion.accuracy();
        let float_accuracy = float_confusion.accuracy();
        let evaluation = Self {
            samples: summary.samples,
            fixed_accuracy,
            float_accuracy,
            accuracy_delta: fixed_accuracy - float_accuracy,
            agreement: agreeing as f64 / summary.samples as f64,
            max_decision_error,
            confusion,
            total_tally: summary.total_tally,
            per_sample_tally: summary.per_sample_tally().unwrap_or_default(),
            mean_ops: summary.mean_ops(),
        };

        tracing::info!(
            samples = evaluation.samples,
            fixed_accuracy = evaluation.fixed_accuracy,
            float_accuracy = evaluation.float_accuracy,
            agreement = evaluation.agreement,
            "Evaluation complete"
        );
        Ok(evaluation)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Samples:            {}", self.samples)?;
        writeln!(f, "Fixed accuracy:     {:.2}%", self.fixed_accuracy * 100.0)?;
        writeln!(f, "Float accuracy:     {:.2}%", self.float_accuracy * 100.0)?;
        writeln!(f, "Delta:              {:+.2}%", self.accuracy_delta * 100.0)?;
        writeln!(f, "Fixed/float agree:  {:.2}%", self.agreement * 100.0)?;
        writeln!(f, "Max decision error: {:.6}", self.max_decision_error)?;
        writeln!(f, "Mean ops/sample:    {:.1}", self.mean_ops)?;
        writeln!(f, "Confusion matrix:")?;
        write!(f, "{}", self.confusion)
    }
}
