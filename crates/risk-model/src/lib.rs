//! Risk Model Contract
//!
//! What a classifier consuming the feature table sees: the feature matrix
//! selection rule, the `fit` / `predict_proba` interface, and the mapping from
//! probabilities to risk levels.

mod assessment;
mod classifier;
mod matrix;

pub use assessment::{assess, nearest_window, RiskAssessment, RiskLevel, WindowSnapshot};
pub use classifier::{BaseRateClassifier, RiskClassifier};
pub use matrix::{FeatureMatrix, EXCLUDED_COLUMNS};

use thiserror::Error;

/// Errors from the model contract
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Model has not been fitted")]
    NotFitted,
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Row count mismatch: {rows} feature rows, {labels} labels")]
    LengthMismatch { rows: usize, labels: usize },
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    FeatureWidthMismatch { expected: usize, actual: usize },
    #[error("Label {0} is not binary")]
    InvalidLabel(u8),
    #[error("Feature table is empty")]
    EmptyTable,
}
