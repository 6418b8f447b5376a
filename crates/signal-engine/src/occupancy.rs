//! Per-frame Area Occupancy

use crate::SignalError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;
use trajectory::{Roi, TrackSample};

/// Occupancy measurement for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyFrame {
    pub frame_idx: u64,
    /// Mean timestamp of the samples in the frame
    pub time_sec: f64,
    /// Summed box area over ROI area; overlapping boxes can push this above 1.0
    pub occupancy_ratio: f64,
}

/// Fraction of the ROI covered by object footprints, per frame
#[derive(Debug, Clone, Copy)]
pub struct OccupancyEstimator {
    roi_area: f64,
}

#[derive(Default)]
struct FrameAccumulator {
    area: f64,
    time_sum: f64,
    count: usize,
}

impl OccupancyEstimator {
    /// Create an estimator; fails when the ROI does not span a positive area
    pub fn new(roi: &Roi) -> Result<Self, SignalError> {
        Ok(Self {
            roi_area: roi.checked_area()?,
        })
    }

    /// Area of the normalising region
    pub fn roi_area(&self) -> f64 {
        self.roi_area
    }

    /// Compute occupancy for every frame present in the (ROI-filtered) samples,
    /// ordered by frame index
    pub fn estimate(&self, samples: &[TrackSample]) -> Vec<OccupancyFrame> {
        let mut frames: BTreeMap<u64, FrameAccumulator> = BTreeMap::new();
        for sample in samples {
            let acc = frames.entry(sample.frame_idx).or_default();
            acc.area += sample.bbox_area();
            acc.time_sum += sample.time_sec;
            acc.count += 1;
        }

        let occupancy: Vec<OccupancyFrame> = frames
            .into_iter()
            .map(|(frame_idx, acc)| OccupancyFrame {
                frame_idx,
                time_sec: acc.time_sum / acc.count as f64,
                occupancy_ratio: acc.area / self.roi_area,
            })
            .collect();

        info!("Computed occupancy for {} frames", occupancy.len());
        metrics::counter!("signal_occupancy_frames_total").increment(occupancy.len() as u64);
        occupancy
    }
}
