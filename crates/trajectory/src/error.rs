//! Trajectory Error Types

use thiserror::Error;

/// Errors raised while checking trajectory inputs
#[derive(Debug, Clone, Error)]
pub enum TrajectoryError {
    /// Region of interest does not span a positive area
    #[error("ROI area must be positive, got {area} (x: [{x_min}, {x_max}], y: [{y_min}, {y_max}])")]
    InvalidRoi {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        area: f64,
    },

    /// A track sample violates the input schema
    #[error("track sample at row {row}: {field} value {value} is out of range")]
    InvalidSample {
        row: usize,
        field: &'static str,
        value: f64,
    },

    /// An incident record has an unusable timestamp
    #[error("incident at row {row}: accident_time_sec {value} is not finite")]
    InvalidIncident { row: usize, value: f64 },
}
