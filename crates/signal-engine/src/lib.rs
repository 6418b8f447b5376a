//! Traffic Signal Engine
//!
//! Derives flow (line crossings), instantaneous speed, and area occupancy from
//! ROI-filtered track samples and buckets them into fixed-width time windows.

mod flow;
mod occupancy;
mod speed;
mod tracks;
mod window;

pub use flow::{FlowDetector, FlowEvent};
pub use occupancy::{OccupancyEstimator, OccupancyFrame};
pub use speed::{SpeedEstimator, SpeedSample, PLAUSIBLE_SPEED_MPS};
pub use tracks::group_by_track;
pub use window::{TimeWindow, WindowAggregator, MPS_TO_KMH};

use thiserror::Error;
use trajectory::TrajectoryError;

/// Errors while deriving signals
#[derive(Debug, Error)]
pub enum SignalError {
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),
    #[error("Time window size must be positive, got {0}s")]
    InvalidWindowSize(u32),
    #[error("meters_per_pixel_y must be positive and finite, got {0}")]
    InvalidCalibration(f64),
}
