//! Classifier Contract

use crate::matrix::FeatureMatrix;
use crate::ModelError;
use tracing::{debug, info};

/// A binary classifier over the feature matrix
pub trait RiskClassifier {
    /// Fit on features `x` and binary labels `y`
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<(), ModelError>;

    /// Probability of the positive (risky) class for each row of `x`
    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>, ModelError>;
}

/// Reference classifier that predicts the training positive rate for every row
#[derive(Debug, Clone, Default)]
pub struct BaseRateClassifier {
    /// (feature width, positive rate) once fitted
    fitted: Option<(usize, f64)>,
}

impl BaseRateClassifier {
    /// Create an unfitted classifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Positive rate learned during `fit`
    pub fn positive_rate(&self) -> Option<f64> {
        self.fitted.map(|(_, rate)| rate)
    }
}

impl RiskClassifier for BaseRateClassifier {
    fn fit(&mut self, x: &FeatureMatrix, y: &[u8]) -> Result<(), ModelError> {
        if x.n_rows() != y.len() {
            return Err(ModelError::LengthMismatch {
                rows: x.n_rows(),
                labels: y.len(),
            });
        }
        if y.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }
        if let Some(&bad) = y.iter().find(|&&label| label > 1) {
            return Err(ModelError::InvalidLabel(bad));
        }

        let positives = y.iter().filter(|&&label| label == 1).count();
        let rate = positives as f64 / y.len() as f64;
        info!(
            "Fitted base-rate classifier on {} rows x {} features: positive rate {:.3}",
            x.n_rows(),
            x.n_features(),
            rate
        );
        self.fitted = Some((x.n_features(), rate));
        Ok(())
    }

    fn predict_proba(&self, x: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        let (width, rate) = self.fitted.ok_or(ModelError::NotFitted)?;
        if x.n_features() != width {
            return Err(ModelError::FeatureWidthMismatch {
                expected: width,
                actual: x.n_features(),
            });
        }
        debug!("Predicting {} rows", x.n_rows());
        Ok(vec![rate; x.n_rows()])
    }
}
