//! Trajectory Records
//!
//! Per-frame track observations produced by the detection/tracking stage,
//! incident timestamps, and the region of interest every signal is measured in.

mod error;
mod region;
mod sample;
mod validator;

pub use error::TrajectoryError;
pub use region::{filter_to_roi, Roi};
pub use sample::{Incident, TrackSample};
pub use validator::SampleValidator;
