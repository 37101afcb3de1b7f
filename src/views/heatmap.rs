use std::collections::BTreeMap;

use super::ViewContext;
use crate::data::aggregate::{aggregate, regions_of, years_of};
use crate::data::model::{Metric, Region};

/// Region × year grid for the selected metric.
///
/// `cells[row][col]` belongs to `regions[row]` and `years[col]`. Missing
/// groups and masked rows are `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub metric: Metric,
    pub regions: Vec<Region>,
    pub years: Vec<i32>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl HeatmapView {
    pub fn cell(&self, region: Region, year: i32) -> Option<f64> {
        let row = self.regions.iter().position(|r| *r == region)?;
        let col = self.years.iter().position(|y| *y == year)?;
        self.cells[row][col]
    }

    /// Min and max over visible cells, for the colour scale.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }
}

/// Build the heatmap payload.
///
/// With a region selected, every other region's row is masked to `None`
/// but kept on the axis, so the grid shape never changes with selection.
pub fn build(ctx: &ViewContext<'_>) -> HeatmapView {
    let metric = ctx.selection.metric;
    let points = aggregate(ctx.store.rows(), metric);
    let regions = regions_of(&points);
    let years = years_of(&points);

    let lookup: BTreeMap<(Region, i32), f64> = points
        .iter()
        .map(|p| ((p.region, p.year), p.value))
        .collect();

    let cells = regions
        .iter()
        .map(|&region| {
            let masked = !ctx.selection.is_emphasized(region);
            years
                .iter()
                .map(|&year| {
                    if masked {
                        None
                    } else {
                        lookup.get(&(region, year)).copied()
                    }
                })
                .collect()
        })
        .collect();

    HeatmapView {
        metric,
        regions,
        years,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::Fixture;

    fn view_for(selected: Option<Region>) -> HeatmapView {
        let mut fx = Fixture::new(Metric::Temperature);
        if let Some(r) = selected {
            fx.selection.toggle_region(r);
        }
        build(&fx.ctx())
    }

    #[test]
    fn grid_has_sorted_axes_and_missing_cells() {
        let view = view_for(None);
        assert_eq!(view.regions, vec![Region::Asia, Region::Europe, Region::Oceania]);
        assert_eq!(view.years, vec![2000, 2001, 2002]);
        assert_eq!(view.cell(Region::Asia, 2001), Some(12.0));
        assert_eq!(view.cell(Region::Oceania, 2000), Some(20.0));
        assert_eq!(view.cell(Region::Oceania, 2002), None);
        assert_eq!(view.value_range(), Some((8.0, 20.0)));
    }

    #[test]
    fn selection_masks_other_rows_without_reshaping() {
        let unselected = view_for(None);
        let view = view_for(Some(Region::Europe));

        assert_eq!(view.regions, unselected.regions);
        assert_eq!(view.years, unselected.years);
        assert_eq!(view.cells.len(), 3);
        assert!(view.cells.iter().all(|row| row.len() == 3));

        assert_eq!(view.cell(Region::Europe, 2002), Some(9.0));
        assert_eq!(view.cells[0], vec![None, None, None]);
        assert_eq!(view.cells[2], vec![None, None, None]);
        assert_eq!(view.value_range(), Some((8.0, 9.0)));
    }
}
