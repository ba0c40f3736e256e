use crate::config::SvmConfig;
use crate::error::{Error, Result};
use crate::model::{FeatureVector, Label, FEATURE_NAMES, N_FEATURES};
use linfa::dataset::Dataset;
use linfa::prelude::*;
use linfa_svm::Svm;
use ndarray::{Array1, Array2};
use std::fmt;
use tracing::info;

/// A feature vector paired with its known label.
pub type LabeledVector = (FeatureVector, Label);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Linear,
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kernel::Linear => f.write_str("linear"),
        }
    }
}

/// A fitted support vector classifier together with the min/max bounds used
/// to normalize its inputs. Read-only once trained.
pub struct TrainedModel {
    svm: Svm<f64, bool>,
    scaler: Vec<(f64, f64)>,
    kernel: Kernel,
    seed: u64,
}

/// Confusion counts of a model over a labeled partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.true_positives + self.true_negatives) as f64 / self.total() as f64
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "True positives: {}, True negatives: {}, False positives: {}, False negatives: {}, Accuracy: {:.3}",
            self.true_positives,
            self.true_negatives,
            self.false_positives,
            self.false_negatives,
            self.accuracy()
        )
    }
}

fn scale(x: f64, (min, max): (f64, f64)) -> f64 {
    if max > min {
        (x - min) / (max - min)
    } else {
        0.0
    }
}

fn to_f64(features: [i64; N_FEATURES]) -> [f64; N_FEATURES] {
    features.map(|v| v as f64)
}

/// Per-feature (min, max) over the training rows.
fn fit_scaler(rows: &[[f64; N_FEATURES]]) -> Vec<(f64, f64)> {
    (0..N_FEATURES)
        .map(|i| {
            rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), row| {
                (min.min(row[i]), max.max(row[i]))
            })
        })
        .collect()
}

/// Trains a linear-kernel SVM on the training partition.
pub fn train(rows: &[LabeledVector], params: &SvmConfig, seed: u64) -> Result<TrainedModel> {
    let positives = rows
        .iter()
        .filter(|(_, label)| *label == Label::PreviousDelay)
        .count();
    if positives == 0 || positives == rows.len() {
        return Err(Error::Training(format!(
            "training partition of {} rows needs both labels, found {} positive",
            rows.len(),
            positives
        )));
    }

    let raw: Vec<[f64; N_FEATURES]> = rows.iter().map(|(v, _)| to_f64(v.to_array())).collect();
    let scaler = fit_scaler(&raw);
    let features: Vec<[f64; N_FEATURES]> = raw
        .iter()
        .map(|row| {
            let mut scaled = [0.0; N_FEATURES];
            for (i, value) in row.iter().enumerate() {
                scaled[i] = scale(*value, scaler[i]);
            }
            scaled
        })
        .collect();
    let labels: Vec<bool> = rows.iter().map(|(_, label)| bool::from(*label)).collect();

    let dataset = Dataset::new(Array2::from(features), Array1::from(labels))
        .with_feature_names(FEATURE_NAMES.to_vec());
    info!(
        "Training model on dataset with shape {:?}",
        dataset.records.shape()
    );
    let svm = Svm::<f64, bool>::params()
        .linear_kernel()
        .pos_neg_weights(params.c, params.c)
        .eps(params.eps)
        .fit(&dataset)?;
    info!("Training complete with {} support vectors", svm.nsupport());

    Ok(TrainedModel {
        svm,
        scaler,
        kernel: Kernel::Linear,
        seed,
    })
}

impl TrainedModel {
    /// Predicts the label of one feature vector given in [`FEATURE_NAMES`] order.
    pub fn predict(&self, features: &[i64]) -> Result<Label> {
        if features.len() != N_FEATURES {
            return Err(Error::InvalidFeatureVector {
                expected: N_FEATURES,
                actual: features.len(),
            });
        }
        let scaled: Vec<f64> = features
            .iter()
            .zip(self.scaler.iter())
            .map(|(value, bounds)| scale(*value as f64, *bounds))
            .collect();
        Ok(Label::from(self.svm.predict(Array1::from(scaled))))
    }

    /// Compares predictions against the known labels of `rows`.
    pub fn evaluate(&self, rows: &[LabeledVector]) -> Result<Evaluation> {
        let mut evaluation = Evaluation::default();
        for (vector, real) in rows {
            let predicted = self.predict(&vector.to_array())?;
            match (bool::from(*real), bool::from(predicted)) {
                (true, true) => evaluation.true_positives += 1,
                (true, false) => evaluation.false_negatives += 1,
                (false, true) => evaluation.false_positives += 1,
                (false, false) => evaluation.true_negatives += 1,
            }
        }
        Ok(evaluation)
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn n_support(&self) -> usize {
        self.svm.nsupport()
    }
}
