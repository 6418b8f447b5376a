//! Feature Matrix Selection

use feature_engine::RiskWindow;

/// Columns never fed to a model: the target and the time key
pub const EXCLUDED_COLUMNS: [&str; 2] = ["risk_label", "window_start_sec"];

/// Row-major model input built from the feature table
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<&'static str>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Select every numeric column except the excluded ones, in table order
    pub fn from_table(table: &[RiskWindow]) -> Self {
        let keep: Vec<usize> = RiskWindow::COLUMNS
            .iter()
            .enumerate()
            .filter(|(_, name)| !EXCLUDED_COLUMNS.contains(*name))
            .map(|(i, _)| i)
            .collect();

        let columns = keep.iter().map(|&i| RiskWindow::COLUMNS[i]).collect();
        let rows = table
            .iter()
            .map(|row| {
                let values = row.values();
                keep.iter().map(|&i| values[i]).collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Target vector matching `from_table`
    pub fn labels(table: &[RiskWindow]) -> Vec<u8> {
        table.iter().map(|row| row.risk_label).collect()
    }

    /// Feature column names
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Feature values of one row
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of feature columns
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Keep a single row
    pub fn select_row(&self, index: usize) -> Option<Self> {
        self.rows.get(index).map(|row| Self {
            columns: self.columns.clone(),
            rows: vec![row.clone()],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{FeatureBuilder, LabeledWindow};
    use signal_engine::TimeWindow;

    fn window(start: i64, flow: u32, label: u8) -> LabeledWindow {
        LabeledWindow {
            window: TimeWindow {
                window_start_sec: start,
                flow_count: Some(flow),
                speed_mean_mps: Some(2.0),
                occupancy_mean: Some(0.1),
                speed_mean_kmh: Some(7.2),
            },
            risk_label: label,
        }
    }

    fn table() -> Vec<RiskWindow> {
        FeatureBuilder::default().build(&[window(0, 3, 0), window(60, 5, 1)])
    }

    #[test]
    fn test_excludes_label_and_time_key() {
        let matrix = FeatureMatrix::from_table(&table());
        assert_eq!(matrix.n_features(), RiskWindow::COLUMNS.len() - 2);
        assert!(!matrix.columns().contains(&"risk_label"));
        assert!(!matrix.columns().contains(&"window_start_sec"));
        assert_eq!(matrix.columns()[0], "flow_count");
        assert_eq!(matrix.columns()[4], "flow_t");
    }

    #[test]
    fn test_rows_and_labels_align() {
        let table = table();
        let matrix = FeatureMatrix::from_table(&table);
        assert_eq!(matrix.n_rows(), 2);
        assert_eq!(matrix.row(1).unwrap()[0], 5.0);
        assert_eq!(FeatureMatrix::labels(&table), vec![0, 1]);
        assert_eq!(matrix.select_row(1).unwrap().n_rows(), 1);
        assert!(matrix.select_row(2).is_none());
    }
}
