use std::collections::BTreeMap;

use eframe::egui::Color32;

use super::ViewContext;
use crate::data::aggregate::aggregate;
use crate::data::model::{Metric, Region};

/// One line of the trend chart.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub region: Region,
    /// `(year, mean)` sorted by year.
    pub points: Vec<(i32, f64)>,
    pub color: Color32,
    pub opacity: f32,
    pub width: f32,
}

/// All years, one line per region.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub metric: Metric,
    pub series: Vec<TrendSeries>,
}

impl TrendView {
    pub fn series_for(&self, region: Region) -> Option<&TrendSeries> {
        self.series.iter().find(|s| s.region == region)
    }
}

/// Build the trend payload.
///
/// Every region with data gets a line. Emphasized regions (the selected one,
/// or all of them when nothing is selected) are opaque and heavier; the
/// selected region's line alone switches to the highlight colour.
pub fn build(ctx: &ViewContext<'_>) -> TrendView {
    let metric = ctx.selection.metric;

    // Aggregation is sorted by year, so per-region points stay sorted.
    let mut by_region: BTreeMap<Region, Vec<(i32, f64)>> = BTreeMap::new();
    for p in aggregate(ctx.store.rows(), metric) {
        by_region.entry(p.region).or_default().push((p.year, p.value));
    }

    let series = by_region
        .into_iter()
        .map(|(region, points)| {
            let emphasized = ctx.selection.is_emphasized(region);
            TrendSeries {
                region,
                points,
                color: if ctx.is_selected(region) {
                    ctx.colors.highlight
                } else {
                    ctx.colors.color_for(region)
                },
                opacity: ctx.opacity_for(region),
                width: if emphasized {
                    ctx.config.selected_width
                } else {
                    ctx.config.dimmed_width
                },
            }
        })
        .collect();

    TrendView { metric, series }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::Fixture;

    #[test]
    fn no_selection_emphasizes_every_line_in_palette_colors() {
        let fx = Fixture::new(Metric::Temperature);
        let view = build(&fx.ctx());

        let regions: Vec<Region> = view.series.iter().map(|s| s.region).collect();
        assert_eq!(regions, vec![Region::Asia, Region::Europe, Region::Oceania]);
        for s in &view.series {
            assert_eq!(s.opacity, 1.0);
            assert_eq!(s.width, 4.0);
            assert_eq!(s.color, fx.colors.color_for(s.region));
        }
        let asia = view.series_for(Region::Asia).unwrap();
        assert_eq!(asia.points, vec![(2000, 11.0), (2001, 12.0), (2002, 13.0)]);
    }

    #[test]
    fn selected_region_is_highlighted_and_others_dimmed() {
        let mut fx = Fixture::new(Metric::Temperature);
        fx.selection.toggle_region(Region::Europe);
        let view = build(&fx.ctx());

        let europe = view.series_for(Region::Europe).unwrap();
        assert_eq!(europe.color, fx.colors.highlight);
        assert_eq!((europe.opacity, europe.width), (1.0, 4.0));

        let asia = view.series_for(Region::Asia).unwrap();
        assert_eq!(asia.color, fx.colors.color_for(Region::Asia));
        assert_eq!((asia.opacity, asia.width), (0.25, 2.0));
    }

    #[test]
    fn regions_without_valid_values_have_no_line() {
        let view = build(&Fixture::new(Metric::Co2).ctx());
        assert_eq!(view.metric, Metric::Co2);
        assert_eq!(view.series.len(), 1);
        assert!(view.series_for(Region::Europe).is_none());
    }
}
