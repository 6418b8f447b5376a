//! Feature Engineering Engine
//!
//! Labels time windows for imminent incidents and derives rolling statistics
//! (mean, std, coefficient of variation, first difference) per traffic signal.

mod features;
mod labeler;
mod statistics;

pub use features::{FeatureBuilder, RiskWindow, SignalFeatures, SpeedColumn, ROLLING_WINDOW};
pub use labeler::{LabeledWindow, RiskLabeler, DEFAULT_LEAD_TIME_SEC};
pub use statistics::{rolling_stats, RollingStats, WindowStats};

use thiserror::Error;

/// Errors during labeling and feature construction
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Neither speed representation exists in the windowed table
    #[error("No speed column found (expected speed_mean_kmh or speed_mean_mps), columns present: {available:?}")]
    MissingSpeedColumn { available: Vec<String> },

    /// Lead time must be a finite, non-negative number of seconds
    #[error("Lead time must be finite and non-negative, got {0}s")]
    InvalidLeadTime(f64),
}
