//! Time Window Aggregation

use crate::flow::FlowEvent;
use crate::occupancy::OccupancyFrame;
use crate::speed::SpeedSample;
use crate::SignalError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// m/s to km/h
pub const MPS_TO_KMH: f64 = 3.6;

/// Per-window signal values after the outer join.
///
/// A `None` means the signal had no coverage in that window, which is not the
/// same as an observed zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub window_start_sec: i64,
    /// Distinct tracks crossing the counting line in the window
    pub flow_count: Option<u32>,
    pub speed_mean_mps: Option<f64>,
    pub occupancy_mean: Option<f64>,
    pub speed_mean_kmh: Option<f64>,
}

impl TimeWindow {
    fn empty(window_start_sec: i64) -> Self {
        Self {
            window_start_sec,
            flow_count: None,
            speed_mean_mps: None,
            occupancy_mean: None,
            speed_mean_kmh: None,
        }
    }
}

/// Running arithmetic mean
#[derive(Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Buckets the three signals into fixed-width, non-overlapping windows
#[derive(Debug, Clone, Copy)]
pub struct WindowAggregator {
    window_size_sec: u32,
}

impl WindowAggregator {
    /// Create an aggregator with the given window width in seconds
    pub fn new(window_size_sec: u32) -> Result<Self, SignalError> {
        if window_size_sec == 0 {
            return Err(SignalError::InvalidWindowSize(window_size_sec));
        }
        Ok(Self { window_size_sec })
    }

    /// Window width in seconds
    pub fn window_size_sec(&self) -> u32 {
        self.window_size_sec
    }

    /// `floor(t / W) * W`
    pub fn window_start(&self, time_sec: f64) -> i64 {
        let width = i64::from(self.window_size_sec);
        (time_sec / width as f64).floor() as i64 * width
    }

    fn mean_by_window(&self, points: impl Iterator<Item = (f64, f64)>) -> BTreeMap<i64, f64> {
        let mut means: BTreeMap<i64, Mean> = BTreeMap::new();
        for (time_sec, value) in points {
            means.entry(self.window_start(time_sec)).or_default().push(value);
        }
        means.into_iter().map(|(start, m)| (start, m.value())).collect()
    }

    /// Count distinct crossing tracks per window
    pub fn flow_counts(&self, events: &[FlowEvent]) -> BTreeMap<i64, u32> {
        let mut tracks: BTreeMap<i64, BTreeSet<&str>> = BTreeMap::new();
        for event in events {
            tracks
                .entry(self.window_start(event.cross_time_sec))
                .or_default()
                .insert(event.track_id.as_str());
        }
        tracks
            .into_iter()
            .map(|(start, ids)| (start, ids.len() as u32))
            .collect()
    }

    /// Mean speed per window (m/s)
    pub fn speed_means(&self, speeds: &[SpeedSample]) -> BTreeMap<i64, f64> {
        self.mean_by_window(speeds.iter().map(|s| (s.time_sec, s.speed_mps)))
    }

    /// Mean occupancy ratio per window
    pub fn occupancy_means(&self, frames: &[OccupancyFrame]) -> BTreeMap<i64, f64> {
        self.mean_by_window(frames.iter().map(|f| (f.time_sec, f.occupancy_ratio)))
    }

    /// Aggregate and outer-join all three signals, ascending by window start
    pub fn aggregate(
        &self,
        flow_events: &[FlowEvent],
        speeds: &[SpeedSample],
        occupancy: &[OccupancyFrame],
    ) -> Vec<TimeWindow> {
        let mut windows: BTreeMap<i64, TimeWindow> = BTreeMap::new();

        for (start, count) in self.flow_counts(flow_events) {
            windows.entry(start).or_insert_with(|| TimeWindow::empty(start)).flow_count = Some(count);
        }
        for (start, mean) in self.speed_means(speeds) {
            windows.entry(start).or_insert_with(|| TimeWindow::empty(start)).speed_mean_mps = Some(mean);
        }
        for (start, mean) in self.occupancy_means(occupancy) {
            windows.entry(start).or_insert_with(|| TimeWindow::empty(start)).occupancy_mean = Some(mean);
        }

        let merged: Vec<TimeWindow> = windows
            .into_values()
            .map(|mut w| {
                w.speed_mean_kmh = w.speed_mean_mps.map(|mps| mps * MPS_TO_KMH);
                w
            })
            .collect();

        info!(
            "Aggregated {} flow events, {} speed samples, {} occupancy frames into {} windows of {}s",
            flow_events.len(),
            speeds.len(),
            occupancy.len(),
            merged.len(),
            self.window_size_sec
        );
        metrics::gauge!("signal_windows").set(merged.len() as f64);
        merged
    }
}
