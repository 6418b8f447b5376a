//! Input record types

use serde::{Deserialize, Serialize};

/// One observed detection of one tracked object at one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSample {
    pub camera_id: String,
    #[serde(default)]
    pub video_path: String,
    /// Frame index, starting at 1
    pub frame_idx: u64,
    /// Seconds since the start of the video (frame_idx / fps)
    pub time_sec: f64,
    /// Identifier stable across frames for one physical object
    pub track_id: String,
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl TrackSample {
    /// Bounding-box footprint in square pixels
    pub fn bbox_area(&self) -> f64 {
        self.width * self.height
    }
}

/// A recorded incident on the same clock as the track timestamps
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub accident_time_sec: f64,
}
