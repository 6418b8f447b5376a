//! Stage orchestration

use crate::config::PipelineConfig;
use crate::PipelineError;
use feature_engine::{FeatureBuilder, RiskLabeler, RiskWindow, SpeedColumn};
use risk_model::{assess, BaseRateClassifier, FeatureMatrix, RiskAssessment, RiskClassifier};
use signal_engine::{FlowDetector, OccupancyEstimator, SpeedEstimator, TimeWindow, WindowAggregator};
use tracing::info;
use trajectory::{filter_to_roi, Incident, SampleValidator, TrackSample};

/// Tracks → ROI filter → {flow, speed, occupancy} → time windows
pub fn build_time_series(
    samples: &[TrackSample],
    config: &PipelineConfig,
) -> Result<Vec<TimeWindow>, PipelineError> {
    let flow = FlowDetector::new(config.counting_line_y);
    let speed = SpeedEstimator::new(config.meters_per_pixel_y)?;
    let occupancy = OccupancyEstimator::new(&config.roi)?;
    let aggregator = WindowAggregator::new(config.time_window_sec)?;

    let in_roi = filter_to_roi(samples, &config.roi);
    let events = flow.detect(&in_roi);
    let speeds = speed.estimate(&in_roi);
    let frames = occupancy.estimate(&in_roi);

    Ok(aggregator.aggregate(&events, &speeds, &frames))
}

/// Time windows + incidents → labeled feature table
pub fn build_risk_windows(
    windows: &[TimeWindow],
    speed_column: SpeedColumn,
    incidents: &[Incident],
    lead_time_sec: f64,
) -> Result<Vec<RiskWindow>, PipelineError> {
    let labeled = RiskLabeler::new(lead_time_sec)?.label(windows, incidents);
    Ok(FeatureBuilder::new(speed_column).build(&labeled))
}

/// Runs stages against the artifact paths of a configuration
pub struct Pipeline {
    config: PipelineConfig,
    validator: SampleValidator,
}

impl Pipeline {
    /// Create a pipeline; the configuration is validated first
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            validator: SampleValidator::new(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn load_tracks(&self) -> Result<Vec<TrackSample>, PipelineError> {
        let samples = storage::read_tracks(&self.config.paths.tracks)?;
        self.validator.validate_samples(&samples)?;
        Ok(samples)
    }

    fn load_incidents(&self) -> Result<Vec<Incident>, PipelineError> {
        let incidents = storage::read_incidents(&self.config.paths.incidents)?;
        self.validator.validate_incidents(&incidents)?;
        Ok(incidents)
    }

    /// Build and persist the windowed signal table
    pub fn run_timeseries(&self) -> Result<Vec<TimeWindow>, PipelineError> {
        let windows = build_time_series(&self.load_tracks()?, &self.config)?;
        storage::write_signal_table(&self.config.paths.timeseries, &windows)?;
        Ok(windows)
    }

    /// Build and persist the feature table from a stored signal table
    pub fn run_features(&self) -> Result<Vec<RiskWindow>, PipelineError> {
        let table = storage::read_signal_table(&self.config.paths.timeseries)?;
        let speed_column = SpeedColumn::from_columns(&table.columns)?;
        let incidents = self.load_incidents()?;

        let rows = build_risk_windows(
            &table.windows,
            speed_column,
            &incidents,
            self.config.lead_time_sec,
        )?;
        storage::write_feature_table(&self.config.paths.risk_windows, &rows)?;
        Ok(rows)
    }

    /// Run every stage; nothing is written unless all inputs load and all
    /// stages succeed
    pub fn run(&self) -> Result<Vec<RiskWindow>, PipelineError> {
        info!("Running full pipeline for {}", self.config.camera_id);
        let samples = self.load_tracks()?;
        let incidents = self.load_incidents()?;

        let windows = build_time_series(&samples, &self.config)?;
        let rows = build_risk_windows(
            &windows,
            SpeedColumn::Kmh,
            &incidents,
            self.config.lead_time_sec,
        )?;

        storage::write_signal_table(&self.config.paths.timeseries, &windows)?;
        storage::write_feature_table(&self.config.paths.risk_windows, &rows)?;
        info!(
            "Pipeline finished: {} windows, {} risky",
            rows.len(),
            rows.iter().filter(|r| r.risk_label == 1).count()
        );
        Ok(rows)
    }

    /// Score the stored window nearest to `target_sec` with a base-rate model
    /// fitted on the stored table
    pub fn inspect(&self, target_sec: f64) -> Result<RiskAssessment, PipelineError> {
        let table = storage::read_feature_table(&self.config.paths.risk_windows)?;
        let mut model = BaseRateClassifier::new();
        model.fit(&FeatureMatrix::from_table(&table), &FeatureMatrix::labels(&table))?;
        Ok(assess(&model, &table, target_sec)?)
    }
}
