//! Traffic Risk Pipeline
//!
//! Batch pipeline turning per-frame vehicle trajectories into windowed traffic
//! signals and a labeled feature table for incident-risk prediction.

pub mod config;
mod stages;

pub use crate::config::{ArtifactPaths, PipelineConfig};
pub use stages::{build_risk_windows, build_time_series, Pipeline};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Pipeline errors; all of them abort the run before artifacts are written
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Trajectory(#[from] trajectory::TrajectoryError),
    #[error(transparent)]
    Signal(#[from] signal_engine::SignalError),
    #[error(transparent)]
    Feature(#[from] feature_engine::FeatureError),
    #[error(transparent)]
    Storage(#[from] storage::StorageError),
    #[error(transparent)]
    Model(#[from] risk_model::ModelError),
}

/// Initialize logging; `RUST_LOG` overrides the default `info` level.
///
/// Later calls are ignored.
pub fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let result = if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
