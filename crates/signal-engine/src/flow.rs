//! Flow Event Detection (counting-line crossings)

use crate::tracks::group_by_track;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use trajectory::TrackSample;

/// A single line-crossing occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub track_id: String,
    pub cross_time_sec: f64,
}

/// Detects the first crossing of a horizontal counting line per track.
///
/// Only decreasing-Y crossings count: the centroid must move from strictly
/// below the line value to at-or-past it (`prev.y > line >= curr.y`).
#[derive(Debug, Clone, Copy)]
pub struct FlowDetector {
    counting_line_y: f64,
}

impl FlowDetector {
    /// Create a detector for the given image row
    pub fn new(counting_line_y: f64) -> Self {
        Self { counting_line_y }
    }

    fn crosses(&self, prev: &TrackSample, curr: &TrackSample) -> bool {
        prev.y_center > self.counting_line_y && self.counting_line_y >= curr.y_center
    }

    /// First qualifying crossing of one time-ordered track, if any
    pub fn first_crossing(&self, track: &[&TrackSample]) -> Option<FlowEvent> {
        // Scanning stops at the first hit; later re-crossings never count.
        track
            .windows(2)
            .find(|pair| self.crosses(pair[0], pair[1]))
            .map(|pair| FlowEvent {
                track_id: pair[1].track_id.clone(),
                cross_time_sec: pair[1].time_sec,
            })
    }

    /// Detect flow events over all tracks, ordered by track id
    pub fn detect(&self, samples: &[TrackSample]) -> Vec<FlowEvent> {
        let groups = group_by_track(samples);
        let events: Vec<FlowEvent> = groups
            .values()
            .filter_map(|track| self.first_crossing(track))
            .collect();

        debug!(
            "Counting line y={}: {} tracks scanned",
            self.counting_line_y,
            groups.len()
        );
        info!("Detected {} flow events", events.len());
        metrics::counter!("signal_flow_events_total").increment(events.len() as u64);
        events
    }
}
