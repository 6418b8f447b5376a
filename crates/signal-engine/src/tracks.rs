//! Per-track grouping

use std::collections::BTreeMap;
use trajectory::TrackSample;

/// Group samples by `track_id`, each group sorted by `time_sec`.
///
/// The sort is stable, so samples sharing a timestamp keep their input order.
pub fn group_by_track(samples: &[TrackSample]) -> BTreeMap<&str, Vec<&TrackSample>> {
    let mut groups: BTreeMap<&str, Vec<&TrackSample>> = BTreeMap::new();
    for sample in samples {
        groups.entry(sample.track_id.as_str()).or_default().push(sample);
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| a.time_sec.total_cmp(&b.time_sec));
    }
    groups
}
