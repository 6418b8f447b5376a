//! Input Validator for Track and Incident Records

use crate::error::TrajectoryError;
use crate::sample::{Incident, TrackSample};
use tracing::warn;

/// Range checks for records arriving from the tracking stage
#[derive(Debug, Clone, Default)]
pub struct SampleValidator;

impl SampleValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a single value against a lower bound, rejecting non-finite input
    fn validate_min(
        &self,
        row: usize,
        field: &'static str,
        value: f64,
        min: f64,
    ) -> Result<(), TrajectoryError> {
        if !value.is_finite() || value < min {
            warn!("Rejecting row {}: {} = {}", row, field, value);
            Err(TrajectoryError::InvalidSample { row, field, value })
        } else {
            Ok(())
        }
    }

    /// Validate one track sample; `row` is its zero-based position in the input
    pub fn validate_sample(&self, row: usize, sample: &TrackSample) -> Result<(), TrajectoryError> {
        self.validate_min(row, "frame_idx", sample.frame_idx as f64, 1.0)?;
        self.validate_min(row, "time_sec", sample.time_sec, 0.0)?;
        self.validate_min(row, "x_center", sample.x_center, f64::MIN)?;
        self.validate_min(row, "y_center", sample.y_center, f64::MIN)?;
        self.validate_min(row, "width", sample.width, 0.0)?;
        self.validate_min(row, "height", sample.height, 0.0)?;
        Ok(())
    }

    /// Validate a whole table, stopping at the first bad row
    pub fn validate_samples(&self, samples: &[TrackSample]) -> Result<(), TrajectoryError> {
        samples
            .iter()
            .enumerate()
            .try_for_each(|(row, s)| self.validate_sample(row, s))
    }

    /// Validate incident timestamps
    pub fn validate_incidents(&self, incidents: &[Incident]) -> Result<(), TrajectoryError> {
        for (row, incident) in incidents.iter().enumerate() {
            if !incident.accident_time_sec.is_finite() {
                return Err(TrajectoryError::InvalidIncident {
                    row,
                    value: incident.accident_time_sec,
                });
            }
        }
        Ok(())
    }
}
