use feature_engine::RiskWindow;
use pipeline::{build_risk_windows, build_time_series, ArtifactPaths, Pipeline, PipelineConfig, PipelineError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use trajectory::{Incident, Roi, TrackSample};

const FPS: f64 = 25.0;

fn config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        camera_id: "cam_01".to_string(),
        roi: Roi {
            x_min: 0.0,
            x_max: 1280.0,
            y_min: 0.0,
            y_max: 720.0,
        },
        meters_per_pixel_y: 0.05,
        counting_line_y: 300.0,
        time_window_sec: 60,
        lead_time_sec: 300.0,
        paths: ArtifactPaths {
            tracks: dir.join("interim/tracks_cam01.csv"),
            incidents: dir.join("accidents_cam01.csv"),
            timeseries: dir.join("processed/timeseries_cam01.csv"),
            risk_windows: dir.join("processed/risk_windows_cam01.csv"),
        },
    }
}

fn sample(track_id: &str, time_sec: f64, y: f64) -> TrackSample {
    TrackSample {
        camera_id: "cam_01".to_string(),
        video_path: "data/raw/highway_cam01.mp4".to_string(),
        frame_idx: (time_sec * FPS).round() as u64,
        time_sec,
        track_id: track_id.to_string(),
        x_center: 640.0,
        y_center: y,
        width: 40.0,
        height: 30.0,
    }
}

fn write_tracks(path: &Path, samples: &[TrackSample]) {
    let mut text =
        String::from("camera_id,video_path,frame_idx,time_sec,track_id,x_center,y_center,width,height\n");
    for s in samples {
        text.push_str(&format!(
            "{},{},{},{},{},{},{},{},{}\n",
            s.camera_id, s.video_path, s.frame_idx, s.time_sec, s.track_id, s.x_center, s.y_center, s.width, s.height
        ));
    }
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn write_incidents(path: &Path, times: &[f64]) {
    let mut text = String::from("accident_time_sec\n");
    for t in times {
        text.push_str(&format!("{}\n", t));
    }
    fs::write(path, text).unwrap();
}

fn scenario_tracks() -> Vec<TrackSample> {
    vec![
        // Crosses the line at t=5.0
        sample("1", 4.0, 310.0),
        sample("1", 5.0, 290.0),
        // Never crosses
        sample("2", 4.0, 500.0),
        sample("2", 5.0, 450.0),
        // 50 px in 1 s inside window 60
        sample("3", 61.0, 650.0),
        sample("3", 62.0, 600.0),
        // Window 360
        sample("4", 361.0, 650.0),
        sample("4", 362.0, 600.0),
    ]
}

fn window(rows: &[RiskWindow], start: i64) -> &RiskWindow {
    rows.iter()
        .find(|r| r.window_start_sec == start)
        .unwrap_or_else(|| panic!("window {} missing", start))
}

#[test]
fn test_flow_counts_single_crossing() {
    let dir = TempDir::new().unwrap();
    let windows = build_time_series(&scenario_tracks(), &config(dir.path())).unwrap();

    assert_eq!(windows[0].window_start_sec, 0);
    assert_eq!(windows[0].flow_count, Some(1));
}

#[test]
fn test_speed_conversion() {
    let dir = TempDir::new().unwrap();
    let windows = build_time_series(&scenario_tracks(), &config(dir.path())).unwrap();

    let w60 = windows.iter().find(|w| w.window_start_sec == 60).unwrap();
    assert!((w60.speed_mean_mps.unwrap() - 2.5).abs() < 1e-9);
    assert!((w60.speed_mean_kmh.unwrap() - 9.0).abs() < 1e-9);
    assert_eq!(w60.flow_count, None);
}

#[test]
fn test_samples_outside_roi_contribute_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    config.roi.y_max = 400.0;
    let windows = build_time_series(&scenario_tracks(), &config).unwrap();

    // Tracks 2, 3 and 4 lie below y=400 and vanish entirely
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].flow_count, Some(1));
}

#[test]
fn test_lead_time_labels() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let windows = build_time_series(&scenario_tracks(), &config).unwrap();
    let rows = build_risk_windows(
        &windows,
        feature_engine::SpeedColumn::Kmh,
        &[Incident {
            accident_time_sec: 620.0,
        }],
        config.lead_time_sec,
    )
    .unwrap();

    assert_eq!(window(&rows, 60).risk_label, 0);
    assert_eq!(window(&rows, 360).risk_label, 1);
}

#[test]
fn test_full_run_writes_feature_table() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    write_tracks(&config.paths.tracks, &scenario_tracks());
    write_incidents(&config.paths.incidents, &[620.0]);

    let rows = Pipeline::new(config.clone()).unwrap().run().unwrap();
    assert_eq!(rows.len(), 3);

    let first = window(&rows, 0);
    assert_eq!(first.flow_t, 1.0);
    assert_eq!(first.flow_mean_3, 1.0);
    assert_eq!(first.flow_std_3, 0.0);
    assert_eq!(first.flow_cv_3, 0.0);
    assert_eq!(first.flow_delta_1, 0.0);

    let text = fs::read_to_string(&config.paths.risk_windows).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, RiskWindow::COLUMNS.join(","));
    assert_eq!(text.lines().count(), 4);
    assert!(config.paths.timeseries.is_file());
}

#[test]
fn test_rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    write_tracks(&config.paths.tracks, &scenario_tracks());
    write_incidents(&config.paths.incidents, &[620.0, 90.0]);

    let pipeline = Pipeline::new(config.clone()).unwrap();
    pipeline.run().unwrap();
    let first_features = fs::read(&config.paths.risk_windows).unwrap();
    let first_signals = fs::read(&config.paths.timeseries).unwrap();

    pipeline.run().unwrap();
    assert_eq!(fs::read(&config.paths.risk_windows).unwrap(), first_features);
    assert_eq!(fs::read(&config.paths.timeseries).unwrap(), first_signals);
}

#[test]
fn test_staged_run_matches_full_run() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    write_tracks(&config.paths.tracks, &scenario_tracks());
    write_incidents(&config.paths.incidents, &[620.0]);

    let pipeline = Pipeline::new(config.clone()).unwrap();
    let full = pipeline.run().unwrap();

    pipeline.run_timeseries().unwrap();
    let staged = pipeline.run_features().unwrap();
    assert_eq!(staged, full);
}

#[test]
fn test_missing_incidents_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    write_tracks(&config.paths.tracks, &scenario_tracks());

    let result = Pipeline::new(config.clone()).unwrap().run();
    assert!(matches!(
        result,
        Err(PipelineError::Storage(storage::StorageError::NotFound(_)))
    ));
    assert!(!config.paths.timeseries.exists());
    assert!(!config.paths.risk_windows.exists());
}

#[test]
fn test_missing_speed_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    fs::create_dir_all(config.paths.timeseries.parent().unwrap()).unwrap();
    fs::write(
        &config.paths.timeseries,
        "window_start_sec,flow_count,occupancy_mean\n0,1,0.1\n",
    )
    .unwrap();
    write_incidents(&config.paths.incidents, &[30.0]);

    let result = Pipeline::new(config.clone()).unwrap().run_features();
    assert!(matches!(
        result,
        Err(PipelineError::Feature(feature_engine::FeatureError::MissingSpeedColumn { .. }))
    ));
    assert!(!config.paths.risk_windows.exists());
}

#[test]
fn test_features_from_mps_only_table() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    fs::create_dir_all(config.paths.timeseries.parent().unwrap()).unwrap();
    fs::write(
        &config.paths.timeseries,
        "window_start_sec,flow_count,speed_mean_mps,occupancy_mean\n0,1,2.5,0.1\n60,,5.0,\n",
    )
    .unwrap();
    write_incidents(&config.paths.incidents, &[]);

    let rows = Pipeline::new(config).unwrap().run_features().unwrap();
    assert!((rows[0].speed_t - 9.0).abs() < 1e-9);
    assert!((rows[1].speed_delta_1 - 9.0).abs() < 1e-9);
    assert_eq!(rows[1].flow_count, 0.0);
    assert_eq!(rows[1].occ_t, 0.0);
}

#[test]
fn test_invalid_track_row_is_fatal() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    let mut tracks = scenario_tracks();
    tracks[2].width = -1.0;
    write_tracks(&config.paths.tracks, &tracks);
    write_incidents(&config.paths.incidents, &[620.0]);

    let result = Pipeline::new(config.clone()).unwrap().run();
    assert!(matches!(
        result,
        Err(PipelineError::Trajectory(trajectory::TrajectoryError::InvalidSample { row: 2, .. }))
    ));
    assert!(!config.paths.risk_windows.exists());
}

#[test]
fn test_inspect_nearest_window() {
    let dir = TempDir::new().unwrap();
    let config = config(dir.path());
    write_tracks(&config.paths.tracks, &scenario_tracks());
    write_incidents(&config.paths.incidents, &[620.0]);

    let pipeline = Pipeline::new(config).unwrap();
    pipeline.run().unwrap();

    let assessment = pipeline.inspect(340.0).unwrap();
    assert_eq!(assessment.window.window_start_sec, 360);
    assert_eq!(assessment.window.clock, "06:00");
    assert_eq!(assessment.window.risk_label, 1);
    // One risky window out of three
    assert!((assessment.risk_prob - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(assessment.risk_level, risk_model::RiskLevel::Low);
}
