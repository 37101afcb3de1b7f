use std::collections::{BTreeMap, BTreeSet};

use super::filter::{MeanAccumulator, valid_observations};
use super::model::{ClimateRow, Metric, Region};

// ---------------------------------------------------------------------------
// (year, region) means
// ---------------------------------------------------------------------------

/// Mean of one metric over all valid rows sharing `(year, region)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPoint {
    pub year: i32,
    pub region: Region,
    pub metric: Metric,
    pub value: f64,
}

/// Group valid rows by year, then by region, and average `metric` per group.
///
/// Output is sorted ascending by year, then by region name, with at most one
/// point per `(year, region)`. Groups without a single valid value are
/// omitted rather than zero-filled.
pub fn aggregate(rows: &[ClimateRow], metric: Metric) -> Vec<AggregatedPoint> {
    // `Region`'s Ord is its name order, so map iteration order is the
    // output order.
    let mut groups: BTreeMap<i32, BTreeMap<Region, MeanAccumulator>> = BTreeMap::new();
    for obs in valid_observations(rows, metric) {
        groups
            .entry(obs.year)
            .or_default()
            .entry(obs.region)
            .or_default()
            .push(obs.value);
    }

    groups
        .into_iter()
        .flat_map(|(year, by_region)| {
            by_region.into_iter().filter_map(move |(region, acc)| {
                acc.mean().map(|value| AggregatedPoint {
                    year,
                    region,
                    metric,
                    value,
                })
            })
        })
        .collect()
}

/// Sorted, de-duplicated regions present in an aggregation.
pub fn regions_of(points: &[AggregatedPoint]) -> Vec<Region> {
    points
        .iter()
        .map(|p| p.region)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted, de-duplicated years present in an aggregation.
pub fn years_of(points: &[AggregatedPoint]) -> Vec<i32> {
    points
        .iter()
        .map(|p| p.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp(year: i32, continent: &str, value: f64) -> ClimateRow {
        ClimateRow::new(Some(year), continent, "X").with(Metric::Temperature, value)
    }

    #[test]
    fn averages_rows_sharing_year_and_region() {
        let rows = vec![temp(2000, "Asia", 10.0), temp(2000, "Asia", 20.0)];
        let points = aggregate(&rows, Metric::Temperature);
        assert_eq!(
            points,
            vec![AggregatedPoint {
                year: 2000,
                region: Region::Asia,
                metric: Metric::Temperature,
                value: 15.0,
            }]
        );
    }

    #[test]
    fn output_sorted_by_year_then_region_name() {
        let rows = vec![
            temp(2001, "South America", 1.0),
            temp(2000, "Oceania", 2.0),
            temp(2001, "Africa", 3.0),
            temp(2000, "North America", 4.0),
            temp(2000, "Europe", 5.0),
        ];
        let keys: Vec<(i32, &str)> = aggregate(&rows, Metric::Temperature)
            .iter()
            .map(|p| (p.year, p.region.name()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (2000, "Europe"),
                (2000, "North America"),
                (2000, "Oceania"),
                (2001, "Africa"),
                (2001, "South America"),
            ]
        );
    }

    #[test]
    fn non_finite_values_do_not_shift_the_mean() {
        let clean = vec![temp(2010, "Europe", 4.0), temp(2010, "Europe", 6.0)];
        let mut dirty = clean.clone();
        dirty.push(temp(2010, "Europe", f64::NAN));
        dirty.push(temp(2010, "Europe", f64::NEG_INFINITY));

        assert_eq!(
            aggregate(&clean, Metric::Temperature),
            aggregate(&dirty, Metric::Temperature)
        );
    }

    #[test]
    fn empty_groups_and_unknown_regions_are_omitted() {
        let rows = vec![
            temp(2000, "Asia", f64::NAN),
            temp(2000, "Antarctica", 1.0),
            ClimateRow::new(None, "Asia", "X").with(Metric::Temperature, 1.0),
        ];
        assert!(aggregate(&rows, Metric::Temperature).is_empty());
    }

    #[test]
    fn at_most_one_point_per_year_region() {
        let mut rows = Vec::new();
        for year in 2000..2005 {
            for region in Region::ALL {
                for k in 0..3_i32 {
                    rows.push(temp(year, region.name(), f64::from(k)));
                }
            }
        }
        let points = aggregate(&rows, Metric::Temperature);
        let unique: BTreeSet<(i32, Region)> = points.iter().map(|p| (p.year, p.region)).collect();
        assert_eq!(unique.len(), points.len());
        assert_eq!(points.len(), 5 * Region::ALL.len());
        assert!(points.iter().all(|p| (p.value - 1.0).abs() < 1e-12));
    }

    #[test]
    fn axes_are_sorted_and_deduplicated() {
        let rows = vec![
            temp(2003, "Europe", 1.0),
            temp(2001, "Asia", 1.0),
            temp(2003, "Asia", 1.0),
        ];
        let points = aggregate(&rows, Metric::Temperature);
        assert_eq!(years_of(&points), vec![2001, 2003]);
        assert_eq!(regions_of(&points), vec![Region::Asia, Region::Europe]);
    }
}
