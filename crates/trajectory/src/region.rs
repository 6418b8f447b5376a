//! Region of Interest Filtering

use crate::error::TrajectoryError;
use crate::sample::TrackSample;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rectangular pixel region within which signals are measured
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Roi {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Roi {
    /// Area in square pixels (may be zero or negative for a bad config)
    pub fn area(&self) -> f64 {
        (self.x_max - self.x_min) * (self.y_max - self.y_min)
    }

    /// Area of the region, failing unless it is strictly positive
    pub fn checked_area(&self) -> Result<f64, TrajectoryError> {
        let area = self.area();
        if area > 0.0 {
            Ok(area)
        } else {
            Err(TrajectoryError::InvalidRoi {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
                area,
            })
        }
    }

    /// Closed-rectangle test on a centroid; all four bounds are inclusive
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x_min <= x && x <= self.x_max && self.y_min <= y && y <= self.y_max
    }
}

/// Keep only the samples whose centroid lies inside the ROI
pub fn filter_to_roi(samples: &[TrackSample], roi: &Roi) -> Vec<TrackSample> {
    let kept: Vec<TrackSample> = samples
        .iter()
        .filter(|s| roi.contains(s.x_center, s.y_center))
        .cloned()
        .collect();

    debug!(
        "ROI filter kept {} of {} samples",
        kept.len(),
        samples.len()
    );
    kept
}
