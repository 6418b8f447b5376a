//! Typed pipeline tables

use crate::csv_io::{read_records, write_records};
use crate::StorageError;
use feature_engine::RiskWindow;
use signal_engine::TimeWindow;
use std::path::Path;
use tracing::info;
use trajectory::{Incident, TrackSample};

const TRACK_COLUMNS: [&str; 8] = [
    "camera_id",
    "frame_idx",
    "time_sec",
    "track_id",
    "x_center",
    "y_center",
    "width",
    "height",
];

const SIGNAL_COLUMNS: [&str; 5] = [
    "window_start_sec",
    "flow_count",
    "speed_mean_mps",
    "occupancy_mean",
    "speed_mean_kmh",
];

/// Windowed signal table as read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct SignalTable {
    /// Header of the source file, used to decide which speed column exists
    pub columns: Vec<String>,
    pub windows: Vec<TimeWindow>,
}

/// Load the per-frame track table produced by the tracking stage
pub fn read_tracks(path: &Path) -> Result<Vec<TrackSample>, StorageError> {
    let (_, samples) = read_records(path, &TRACK_COLUMNS)?;
    info!("Loaded {} track samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Load incident timestamps
pub fn read_incidents(path: &Path) -> Result<Vec<Incident>, StorageError> {
    let (_, incidents) = read_records(path, &["accident_time_sec"])?;
    info!("Loaded {} incidents from {}", incidents.len(), path.display());
    Ok(incidents)
}

/// Persist the windowed signal table
pub fn write_signal_table(path: &Path, windows: &[TimeWindow]) -> Result<(), StorageError> {
    write_records(path, &SIGNAL_COLUMNS, windows)?;
    info!("Saved {} signal windows to {}", windows.len(), path.display());
    Ok(())
}

/// Load a windowed signal table; either speed column may be absent
pub fn read_signal_table(path: &Path) -> Result<SignalTable, StorageError> {
    let (columns, windows) =
        read_records(path, &["window_start_sec", "flow_count", "occupancy_mean"])?;
    info!("Loaded {} signal windows from {}", windows.len(), path.display());
    Ok(SignalTable { columns, windows })
}

/// Persist the model-ready feature table
pub fn write_feature_table(path: &Path, rows: &[RiskWindow]) -> Result<(), StorageError> {
    write_records(path, &RiskWindow::COLUMNS, rows)?;
    info!("Saved {} feature rows to {}", rows.len(), path.display());
    Ok(())
}

/// Load the feature table
pub fn read_feature_table(path: &Path) -> Result<Vec<RiskWindow>, StorageError> {
    let (_, rows) = read_records(path, &RiskWindow::COLUMNS)?;
    info!("Loaded {} feature rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn window(start: i64, flow: Option<u32>, mps: Option<f64>) -> TimeWindow {
        TimeWindow {
            window_start_sec: start,
            flow_count: flow,
            speed_mean_mps: mps,
            occupancy_mean: Some(0.25),
            speed_mean_kmh: mps.map(|v| v * 3.6),
        }
    }

    #[test]
    fn test_tracks_from_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tracks.csv");
        fs::write(
            &path,
            "camera_id,video_path,frame_idx,time_sec,track_id,x_center,y_center,width,height\n\
             cam_01,data/raw/highway_cam01.mp4,1,0.04,3,320.5,310.0,40.0,30.0\n\
             cam_01,data/raw/highway_cam01.mp4,2,0.08,3,321.0,290.0,40.0,30.0\n",
        )
        .unwrap();

        let tracks = read_tracks(&path).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].track_id, "3");
        assert_eq!(tracks[1].frame_idx, 2);
        assert_eq!(tracks[1].y_center, 290.0);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = read_incidents(&dir.path().join("accidents.csv"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_missing_required_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeseries.csv");
        fs::write(&path, "flow_count,speed_mean_mps,occupancy_mean\n1,2.5,0.1\n").unwrap();

        match read_signal_table(&path) {
            Err(StorageError::MissingColumn { column, .. }) => assert_eq!(column, "window_start_sec"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_signal_table_keeps_missing_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("processed").join("timeseries.csv");
        let windows = vec![window(0, Some(2), None), window(60, None, Some(2.5))];

        write_signal_table(&path, &windows).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("window_start_sec,flow_count,speed_mean_mps,occupancy_mean,speed_mean_kmh\n"));
        assert!(text.contains("\n0,2,,0.25,\n"));

        let table = read_signal_table(&path).unwrap();
        assert_eq!(table.windows, windows);
        assert!(table.columns.iter().any(|c| c == "speed_mean_kmh"));
    }

    #[test]
    fn test_signal_table_without_kmh_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("timeseries.csv");
        fs::write(
            &path,
            "window_start_sec,flow_count,speed_mean_mps,occupancy_mean\n0,1,2.5,0.1\n",
        )
        .unwrap();

        let table = read_signal_table(&path).unwrap();
        assert_eq!(table.windows[0].speed_mean_mps, Some(2.5));
        assert_eq!(table.windows[0].speed_mean_kmh, None);
        assert!(!table.columns.iter().any(|c| c == "speed_mean_kmh"));
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("risk_windows.csv");
        write_feature_table(&path, &[]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), RiskWindow::COLUMNS.join(","));
        assert!(read_feature_table(&path).unwrap().is_empty());
    }
}
