use eframe::egui::Color32;

use super::ViewContext;
use crate::data::model::{Metric, Region};
use crate::data::ranking::rank_by_delta;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingBar {
    pub region: Region,
    pub delta: f64,
    pub color: Color32,
}

/// Change since the baseline year, one bar per region, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingView {
    pub metric: Metric,
    pub baseline_year: i32,
    pub target_year: i32,
    pub bars: Vec<RankingBar>,
}

impl RankingView {
    pub fn axis_label(&self) -> String {
        format!("{} change since {}", self.metric.label(), self.baseline_year)
    }
}

pub fn build(ctx: &ViewContext<'_>) -> RankingView {
    let metric = ctx.selection.metric;
    let baseline_year = ctx.config.baseline_year;
    let target_year = ctx.selection.selected_year;

    let bars = rank_by_delta(ctx.store.rows(), metric, baseline_year, target_year)
        .into_iter()
        .map(|d| RankingBar {
            region: d.region,
            delta: d.delta,
            color: if ctx.is_selected(d.region) {
                ctx.colors.highlight
            } else {
                ctx.colors.neutral
            },
        })
        .collect();

    RankingView {
        metric,
        baseline_year,
        target_year,
        bars,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fixtures::Fixture;

    #[test]
    fn bars_follow_delta_order_and_highlight_selection() {
        let mut fx = Fixture::new(Metric::Temperature);
        fx.selection.toggle_region(Region::Europe);
        let view = build(&fx.ctx());

        assert_eq!(view.target_year, 2002);
        // Asia +2.0, Europe +1.0; Oceania has no 2002 data.
        let bars: Vec<(Region, f64)> = view.bars.iter().map(|b| (b.region, b.delta)).collect();
        assert_eq!(bars, vec![(Region::Asia, 2.0), (Region::Europe, 1.0)]);
        assert_eq!(view.bars[0].color, fx.colors.neutral);
        assert_eq!(view.bars[1].color, fx.colors.highlight);
        assert_eq!(view.axis_label(), "Temperature (°C) change since 2000");
    }

    #[test]
    fn out_of_range_year_gives_empty_bars() {
        let mut fx = Fixture::new(Metric::Temperature);
        fx.selection.set_year(1900);
        let view = build(&fx.ctx());
        assert!(view.bars.is_empty());
        assert_eq!(view.target_year, 1900);
    }
}
