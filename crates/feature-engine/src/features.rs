//! Feature Table Assembly

use crate::labeler::LabeledWindow;
use crate::statistics::{rolling_stats, RollingStats};
use crate::FeatureError;
use serde::{Deserialize, Serialize};
use signal_engine::MPS_TO_KMH;
use tracing::{debug, info};

/// Trailing window (in aggregated windows) for the rolling features
pub const ROLLING_WINDOW: usize = 3;

/// Which speed representation the windowed table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedColumn {
    /// `speed_mean_kmh` is present and preferred
    Kmh,
    /// Only `speed_mean_mps` is present; km/h is derived
    Mps,
}

impl SpeedColumn {
    /// Pick the speed column from a table header
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Result<Self, FeatureError> {
        let has = |name: &str| columns.iter().any(|c| c.as_ref() == name);
        if has("speed_mean_kmh") {
            Ok(SpeedColumn::Kmh)
        } else if has("speed_mean_mps") {
            Ok(SpeedColumn::Mps)
        } else {
            Err(FeatureError::MissingSpeedColumn {
                available: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            })
        }
    }
}

/// Rolling features of one signal at one window, zero-filled
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SignalFeatures {
    pub mean_3: f64,
    pub std_3: f64,
    pub cv_3: f64,
    pub delta_1: f64,
}

impl From<RollingStats> for SignalFeatures {
    fn from(stats: RollingStats) -> Self {
        Self {
            mean_3: fill(stats.mean),
            std_3: fill(stats.std),
            cv_3: fill(stats.cv),
            delta_1: fill(stats.delta),
        }
    }
}

/// Terminal normalisation: anything undefined becomes 0.0.
///
/// This makes "no history" indistinguishable from "no variability"; the output
/// format depends on it.
fn fill(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// One row of the model-ready feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskWindow {
    pub window_start_sec: i64,
    pub flow_count: f64,
    pub speed_mean_mps: f64,
    pub occupancy_mean: f64,
    pub speed_mean_kmh: f64,
    pub risk_label: u8,
    pub flow_t: f64,
    pub speed_t: f64,
    pub occ_t: f64,
    pub flow_mean_3: f64,
    pub flow_std_3: f64,
    pub flow_cv_3: f64,
    pub flow_delta_1: f64,
    pub speed_mean_3: f64,
    pub speed_std_3: f64,
    pub speed_cv_3: f64,
    pub speed_delta_1: f64,
    pub occ_mean_3: f64,
    pub occ_std_3: f64,
    pub occ_cv_3: f64,
    pub occ_delta_1: f64,
}

impl RiskWindow {
    /// Column names in table order
    pub const COLUMNS: [&'static str; 21] = [
        "window_start_sec",
        "flow_count",
        "speed_mean_mps",
        "occupancy_mean",
        "speed_mean_kmh",
        "risk_label",
        "flow_t",
        "speed_t",
        "occ_t",
        "flow_mean_3",
        "flow_std_3",
        "flow_cv_3",
        "flow_delta_1",
        "speed_mean_3",
        "speed_std_3",
        "speed_cv_3",
        "speed_delta_1",
        "occ_mean_3",
        "occ_std_3",
        "occ_cv_3",
        "occ_delta_1",
    ];

    /// Every column as a number, in `COLUMNS` order
    pub fn values(&self) -> [f64; 21] {
        [
            self.window_start_sec as f64,
            self.flow_count,
            self.speed_mean_mps,
            self.occupancy_mean,
            self.speed_mean_kmh,
            f64::from(self.risk_label),
            self.flow_t,
            self.speed_t,
            self.occ_t,
            self.flow_mean_3,
            self.flow_std_3,
            self.flow_cv_3,
            self.flow_delta_1,
            self.speed_mean_3,
            self.speed_std_3,
            self.speed_cv_3,
            self.speed_delta_1,
            self.occ_mean_3,
            self.occ_std_3,
            self.occ_cv_3,
            self.occ_delta_1,
        ]
    }
}

/// Builds the feature table from labeled windows
#[derive(Debug, Clone, Copy)]
pub struct FeatureBuilder {
    speed_column: SpeedColumn,
}

impl FeatureBuilder {
    /// Create a builder reading speed from the given column
    pub fn new(speed_column: SpeedColumn) -> Self {
        Self { speed_column }
    }

    /// Canonical speed (km/h) of a window
    fn speed_kmh(&self, window: &LabeledWindow) -> Option<f64> {
        match self.speed_column {
            SpeedColumn::Kmh => window.window.speed_mean_kmh,
            SpeedColumn::Mps => window.window.speed_mean_mps.map(|mps| mps * MPS_TO_KMH),
        }
    }

    /// Build one feature row per window, ascending by window start
    pub fn build(&self, labeled: &[LabeledWindow]) -> Vec<RiskWindow> {
        let mut ordered = labeled.to_vec();
        ordered.sort_by_key(|w| w.window.window_start_sec);

        let flow: Vec<Option<f64>> = ordered
            .iter()
            .map(|w| w.window.flow_count.map(f64::from))
            .collect();
        let speed: Vec<Option<f64>> = ordered.iter().map(|w| self.speed_kmh(w)).collect();
        let occ: Vec<Option<f64>> = ordered.iter().map(|w| w.window.occupancy_mean).collect();

        let flow_stats = rolling_stats(&flow, ROLLING_WINDOW);
        let speed_stats = rolling_stats(&speed, ROLLING_WINDOW);
        let occ_stats = rolling_stats(&occ, ROLLING_WINDOW);
        debug!(
            "Rolling stats over {} windows with trailing size {}",
            ordered.len(),
            ROLLING_WINDOW
        );

        let rows: Vec<RiskWindow> = ordered
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let f = SignalFeatures::from(flow_stats[i]);
                let s = SignalFeatures::from(speed_stats[i]);
                let o = SignalFeatures::from(occ_stats[i]);
                RiskWindow {
                    window_start_sec: w.window.window_start_sec,
                    flow_count: fill(flow[i]),
                    speed_mean_mps: fill(w.window.speed_mean_mps),
                    occupancy_mean: fill(occ[i]),
                    speed_mean_kmh: fill(speed[i]),
                    risk_label: w.risk_label,
                    flow_t: fill(flow[i]),
                    speed_t: fill(speed[i]),
                    occ_t: fill(occ[i]),
                    flow_mean_3: f.mean_3,
                    flow_std_3: f.std_3,
                    flow_cv_3: f.cv_3,
                    flow_delta_1: f.delta_1,
                    speed_mean_3: s.mean_3,
                    speed_std_3: s.std_3,
                    speed_cv_3: s.cv_3,
                    speed_delta_1: s.delta_1,
                    occ_mean_3: o.mean_3,
                    occ_std_3: o.std_3,
                    occ_cv_3: o.cv_3,
                    occ_delta_1: o.delta_1,
                }
            })
            .collect();

        info!("Built {} feature rows", rows.len());
        rows
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(SpeedColumn::Kmh)
    }
}
