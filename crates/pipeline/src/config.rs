//! Pipeline configuration

use crate::PipelineError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use trajectory::Roi;

/// Prefix for environment overrides, e.g. `TRAFFIC_RISK__TIME_WINDOW_SEC=30`
pub const ENV_PREFIX: &str = "TRAFFIC_RISK";

fn default_camera_id() -> String {
    "cam_01".to_string()
}

fn default_time_window_sec() -> u32 {
    60
}

fn default_lead_time_sec() -> f64 {
    feature_engine::DEFAULT_LEAD_TIME_SEC
}

/// Locations of the input tables and per-stage artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub tracks: PathBuf,
    pub incidents: PathBuf,
    pub timeseries: PathBuf,
    pub risk_windows: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            tracks: PathBuf::from("data/interim/tracks_cam01.csv"),
            incidents: PathBuf::from("data/accidents_cam01.csv"),
            timeseries: PathBuf::from("data/processed/timeseries_cam01.csv"),
            risk_windows: PathBuf::from("data/processed/risk_windows_cam01.csv"),
        }
    }
}

/// Camera calibration and pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_camera_id")]
    pub camera_id: String,
    /// Region of interest (pixels)
    pub roi: Roi,
    /// Ground distance per pixel row (meters)
    pub meters_per_pixel_y: f64,
    /// Image row of the counting line
    pub counting_line_y: f64,
    /// Aggregation window width (seconds)
    #[serde(default = "default_time_window_sec")]
    pub time_window_sec: u32,
    /// Forward labeling horizon (seconds)
    #[serde(default = "default_lead_time_sec")]
    pub lead_time_sec: f64,
    #[serde(default)]
    pub paths: ArtifactPaths,
}

impl PipelineConfig {
    /// Load from a JSON/TOML file layered with `TRAFFIC_RISK__*` environment overrides
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let settings = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: PipelineConfig = settings.try_deserialize()?;
        config.validate()?;

        info!(
            "Loaded config for {} from {}: window={}s lead={}s line_y={}",
            config.camera_id,
            path.display(),
            config.time_window_sec,
            config.lead_time_sec,
            config.counting_line_y
        );
        Ok(config)
    }

    /// Reject structurally invalid settings before any stage runs
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.roi.checked_area()?;
        if !(self.meters_per_pixel_y.is_finite() && self.meters_per_pixel_y > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "meters_per_pixel_y must be positive, got {}",
                self.meters_per_pixel_y
            )));
        }
        if !self.counting_line_y.is_finite() {
            return Err(PipelineError::InvalidConfig(format!(
                "counting_line_y must be finite, got {}",
                self.counting_line_y
            )));
        }
        if self.time_window_sec == 0 {
            return Err(PipelineError::InvalidConfig(
                "time_window_sec must be positive".to_string(),
            ));
        }
        if !(self.lead_time_sec.is_finite() && self.lead_time_sec >= 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "lead_time_sec must be non-negative, got {}",
                self.lead_time_sec
            )));
        }
        Ok(())
    }
}
