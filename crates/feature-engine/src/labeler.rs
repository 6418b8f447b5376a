//! Proactive Risk Labeling

use crate::FeatureError;
use signal_engine::TimeWindow;
use tracing::info;
use trajectory::Incident;

/// Default forward horizon (5 minutes)
pub const DEFAULT_LEAD_TIME_SEC: f64 = 300.0;

/// A time window with its supervision label
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledWindow {
    pub window: TimeWindow,
    /// 1 when an incident falls within the lead-time horizon of the window start
    pub risk_label: u8,
}

/// Labels windows that precede an incident by at most `lead_time_sec`
#[derive(Debug, Clone, Copy)]
pub struct RiskLabeler {
    lead_time_sec: f64,
}

impl RiskLabeler {
    /// Create a labeler with the given horizon
    pub fn new(lead_time_sec: f64) -> Result<Self, FeatureError> {
        if !(lead_time_sec.is_finite() && lead_time_sec >= 0.0) {
            return Err(FeatureError::InvalidLeadTime(lead_time_sec));
        }
        Ok(Self { lead_time_sec })
    }

    /// Forward horizon in seconds
    pub fn lead_time_sec(&self) -> f64 {
        self.lead_time_sec
    }

    /// True when some incident lies in `[t0, t0 + lead]`; `sorted` must be ascending
    fn is_risky(&self, t0: f64, sorted: &[f64]) -> bool {
        let first = sorted.partition_point(|&a| a < t0);
        sorted
            .get(first)
            .is_some_and(|&a| a <= t0 + self.lead_time_sec)
    }

    /// Label every window, returning them ascending by window start
    pub fn label(&self, windows: &[TimeWindow], incidents: &[Incident]) -> Vec<LabeledWindow> {
        let mut times: Vec<f64> = incidents.iter().map(|i| i.accident_time_sec).collect();
        times.sort_by(f64::total_cmp);

        let mut ordered = windows.to_vec();
        ordered.sort_by_key(|w| w.window_start_sec);

        let labeled: Vec<LabeledWindow> = ordered
            .into_iter()
            .map(|window| {
                let risky = self.is_risky(window.window_start_sec as f64, &times);
                LabeledWindow {
                    window,
                    risk_label: u8::from(risky),
                }
            })
            .collect();

        let positives = labeled.iter().filter(|w| w.risk_label == 1).count();
        info!(
            "Labeled {} windows against {} incidents: {} risky (lead {}s)",
            labeled.len(),
            incidents.len(),
            positives,
            self.lead_time_sec
        );
        labeled
    }
}
