//! Instantaneous Speed Estimation

use crate::tracks::group_by_track;
use crate::SignalError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trajectory::TrackSample;

/// Open interval of speeds (m/s) accepted as physically plausible
pub const PLAUSIBLE_SPEED_MPS: (f64, f64) = (0.0, 60.0);

/// One valid instantaneous-speed reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub track_id: String,
    pub time_sec: f64,
    pub speed_mps: f64,
}

/// Lag-1 speed estimator along the image Y axis
#[derive(Debug, Clone, Copy)]
pub struct SpeedEstimator {
    /// Ground distance covered by one pixel row (meters)
    meters_per_pixel_y: f64,
}

impl SpeedEstimator {
    /// Create an estimator with the given calibration constant
    pub fn new(meters_per_pixel_y: f64) -> Result<Self, SignalError> {
        if !(meters_per_pixel_y.is_finite() && meters_per_pixel_y > 0.0) {
            return Err(SignalError::InvalidCalibration(meters_per_pixel_y));
        }
        Ok(Self { meters_per_pixel_y })
    }

    /// Speed between two samples, `None` for a non-positive time delta or an
    /// implausible reading
    pub fn pair_speed(&self, prev: &TrackSample, curr: &TrackSample) -> Option<f64> {
        let dt = curr.time_sec - prev.time_sec;
        if dt <= 0.0 {
            return None;
        }
        let speed_mps = (curr.y_center - prev.y_center).abs() * self.meters_per_pixel_y / dt;
        let (min, max) = PLAUSIBLE_SPEED_MPS;
        (min < speed_mps && speed_mps < max).then_some(speed_mps)
    }

    /// Estimate speeds over all tracks, ordered by track id then time
    pub fn estimate(&self, samples: &[TrackSample]) -> Vec<SpeedSample> {
        let mut pairs = 0usize;
        let mut readings = Vec::new();

        for track in group_by_track(samples).values() {
            for pair in track.windows(2) {
                pairs += 1;
                if let Some(speed_mps) = self.pair_speed(pair[0], pair[1]) {
                    readings.push(SpeedSample {
                        track_id: pair[1].track_id.clone(),
                        time_sec: pair[1].time_sec,
                        speed_mps,
                    });
                }
            }
        }

        let dropped = pairs - readings.len();
        debug!("Speed estimator dropped {} of {} sample pairs", dropped, pairs);
        info!("Estimated {} speed samples", readings.len());
        metrics::counter!("signal_speed_samples_total").increment(readings.len() as u64);
        metrics::counter!("signal_speed_dropped_total").increment(dropped as u64);
        readings
    }
}
