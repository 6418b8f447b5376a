//! Rolling Statistics Computation

/// Summary of the observed values in one trailing window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowStats {
    /// Number of observed (non-missing) values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
}

impl WindowStats {
    /// Compute statistics from a slice of observed values
    pub fn compute(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;

        let std_dev = if values.len() >= 2 {
            let m2: f64 = values.iter().map(|&v| (v - mean) * (v - mean)).sum();
            (m2 / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        Self {
            count: values.len(),
            mean,
            std_dev,
        }
    }
}

/// Rolling features of one series position; `None` marks an undefined value
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RollingStats {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    /// `std / mean`, undefined for a zero mean
    pub cv: Option<f64>,
    /// Lag-1 first difference
    pub delta: Option<f64>,
}

/// Trailing-window statistics over a series with missing values.
///
/// Each position looks at itself and up to `window - 1` predecessors, skipping
/// missing entries. The mean needs one observation, the standard deviation two.
pub fn rolling_stats(series: &[Option<f64>], window: usize) -> Vec<RollingStats> {
    let window = window.max(1);

    series
        .iter()
        .enumerate()
        .map(|(i, current)| {
            let start = (i + 1).saturating_sub(window);
            let observed: Vec<f64> = series[start..=i].iter().flatten().copied().collect();
            let stats = WindowStats::compute(&observed);

            let mean = (stats.count >= 1).then_some(stats.mean);
            let std = (stats.count >= 2).then_some(stats.std_dev);
            let cv = match (std, mean) {
                (Some(s), Some(m)) if m != 0.0 => Some(s / m),
                _ => None,
            };
            let delta = match (i.checked_sub(1).and_then(|p| series[p]), *current) {
                (Some(prev), Some(curr)) => Some(curr - prev),
                _ => None,
            };

            RollingStats {
                mean,
                std,
                cv,
                delta,
            }
        })
        .collect()
}
