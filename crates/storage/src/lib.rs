//! Storage Layer
//!
//! Every pipeline stage persists its output table as a CSV artifact, so a run
//! can resume from any intermediate table.

mod csv_io;
mod tables;

pub use tables::{
    read_feature_table, read_incidents, read_signal_table, read_tracks, write_feature_table,
    write_signal_table, SignalTable,
};

use std::path::PathBuf;
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Input file not found: {0}")]
    NotFound(PathBuf),
    #[error("Required column '{column}' missing from {path}")]
    MissingColumn { path: PathBuf, column: String },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
