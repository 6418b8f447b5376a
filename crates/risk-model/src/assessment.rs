//! Risk Assessment for a Single Window

use crate::classifier::RiskClassifier;
use crate::matrix::FeatureMatrix;
use crate::ModelError;
use feature_engine::RiskWindow;
use serde::Serialize;
use tracing::info;

/// Coarse risk level derived from a predicted probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// High from 0.8, Medium from 0.4, otherwise Low
    pub fn from_probability(prob: f64) -> Self {
        if prob >= 0.8 {
            RiskLevel::High
        } else if prob >= 0.4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Index of the window whose start is closest to `target_sec`; ties go to the
/// earlier row
pub fn nearest_window(table: &[RiskWindow], target_sec: f64) -> Option<usize> {
    table
        .iter()
        .enumerate()
        .map(|(i, row)| (i, (row.window_start_sec as f64 - target_sec).abs()))
        .fold(None, |best: Option<(usize, f64)>, (i, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((i, dist)),
        })
        .map(|(i, _)| i)
}

/// Canonical signals of one window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSnapshot {
    pub window_start_sec: i64,
    /// Window start as `MM:SS`
    pub clock: String,
    /// Vehicles per window
    pub flow_t: f64,
    /// km/h
    pub speed_t: f64,
    pub occ_t: f64,
    pub risk_label: u8,
}

impl From<&RiskWindow> for WindowSnapshot {
    fn from(row: &RiskWindow) -> Self {
        let start = row.window_start_sec;
        Self {
            window_start_sec: start,
            clock: format!("{:02}:{:02}", start.div_euclid(60), start.rem_euclid(60)),
            flow_t: row.flow_t,
            speed_t: row.speed_t,
            occ_t: row.occ_t,
            risk_label: row.risk_label,
        }
    }
}

/// Classifier output for the window nearest to a requested time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub requested_sec: f64,
    pub window: WindowSnapshot,
    pub feature_count: usize,
    pub risk_prob: f64,
    pub risk_level: RiskLevel,
}

/// Score the window nearest to `target_sec` with a fitted classifier
pub fn assess<C: RiskClassifier + ?Sized>(
    classifier: &C,
    table: &[RiskWindow],
    target_sec: f64,
) -> Result<RiskAssessment, ModelError> {
    let index = nearest_window(table, target_sec).ok_or(ModelError::EmptyTable)?;
    let matrix = FeatureMatrix::from_table(table);
    let x = matrix.select_row(index).ok_or(ModelError::EmptyTable)?;

    let risk_prob = classifier
        .predict_proba(&x)?
        .first()
        .copied()
        .ok_or(ModelError::EmptyTable)?;
    let risk_level = RiskLevel::from_probability(risk_prob);

    let window = WindowSnapshot::from(&table[index]);
    info!(
        "Window {} ({}): risk_prob={:.3} level={}",
        window.window_start_sec,
        window.clock,
        risk_prob,
        risk_level.as_str()
    );

    Ok(RiskAssessment {
        requested_sec: target_sec,
        window,
        feature_count: x.n_features(),
        risk_prob,
        risk_level,
    })
}
