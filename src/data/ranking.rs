use std::collections::BTreeMap;

use super::filter::{MeanAccumulator, observations_in_year};
use super::model::{ClimateRow, Metric, Region};

/// Change of one region's mean between the baseline and the target year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionDelta {
    pub region: Region,
    pub delta: f64,
}

/// Per-region mean of `metric` for a single year.
pub fn region_means(rows: &[ClimateRow], metric: Metric, year: i32) -> BTreeMap<Region, f64> {
    let mut groups: BTreeMap<Region, MeanAccumulator> = BTreeMap::new();
    for obs in observations_in_year(rows, metric, year) {
        groups.entry(obs.region).or_default().push(obs.value);
    }
    groups
        .into_iter()
        .filter_map(|(region, acc)| acc.mean().map(|m| (region, m)))
        .collect()
}

/// Rank regions by how much `metric` moved from `baseline_year` to
/// `target_year`, largest increase first.
///
/// Only regions with data in the target year are ranked. A region with no
/// baseline data is measured against 0. Ties keep region name order.
pub fn rank_by_delta(
    rows: &[ClimateRow],
    metric: Metric,
    baseline_year: i32,
    target_year: i32,
) -> Vec<RegionDelta> {
    let baseline = region_means(rows, metric, baseline_year);
    let target = region_means(rows, metric, target_year);

    let mut ranked: Vec<RegionDelta> = target
        .into_iter()
        .map(|(region, mean)| RegionDelta {
            region,
            delta: mean - baseline.get(&region).copied().unwrap_or(0.0),
        })
        .collect();

    // Stable: equal deltas stay in region order.
    ranked.sort_by(|a, b| b.delta.total_cmp(&a.delta));
    ranked
}
