use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::{Region, RowStore};
use crate::state::{ChangedFields, SelectionState, StateField};
use crate::views::{self, HeatmapView, MapView, RankingView, TrendView, ViewContext};

// ---------------------------------------------------------------------------
// Plotting surface
// ---------------------------------------------------------------------------

/// Anything that can draw the four dashboard views.
///
/// The surface receives finished payloads and never computes data itself.
/// Clicks travel back as region labels through
/// [`ViewSynchronizer::region_clicked`].
pub trait PlotSurface {
    fn draw_trend(&mut self, view: &TrendView);
    fn draw_ranking(&mut self, view: &RankingView);
    fn draw_heatmap(&mut self, view: &HeatmapView);
    fn draw_map(&mut self, view: &MapView);
}

/// The four linked views, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewKind {
    Trend,
    Ranking,
    Heatmap,
    Map,
}

impl ViewKind {
    pub const ALL: [ViewKind; 4] = [
        ViewKind::Trend,
        ViewKind::Ranking,
        ViewKind::Heatmap,
        ViewKind::Map,
    ];

    /// Whether this view's encoding reads `field`.
    ///
    /// Trend and heatmap span every year, so the selected year never
    /// affects them.
    pub fn depends_on(self, field: StateField) -> bool {
        match field {
            StateField::Metric | StateField::Region => true,
            StateField::Year => matches!(self, ViewKind::Ranking | ViewKind::Map),
        }
    }
}

/// Views whose payload may differ after `changed`.
pub fn affected_views(changed: &ChangedFields) -> BTreeSet<ViewKind> {
    ViewKind::ALL
        .into_iter()
        .filter(|view| changed.iter().any(|field| view.depends_on(*field)))
        .collect()
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Recomputes and dispatches view payloads after selection changes.
#[derive(Debug, Clone)]
pub struct ViewSynchronizer {
    config: DashboardConfig,
    colors: ColorMap,
}

impl ViewSynchronizer {
    pub fn new(config: DashboardConfig, colors: ColorMap) -> Self {
        Self { config, colors }
    }

    /// Recompute every view affected by `changed` and hand it to `surface`.
    ///
    /// Views are dispatched in [`ViewKind::ALL`] order. Returns the views
    /// that were redrawn.
    pub fn refresh<S: PlotSurface + ?Sized>(
        &self,
        store: &RowStore,
        selection: &SelectionState,
        changed: &ChangedFields,
        surface: &mut S,
    ) -> BTreeSet<ViewKind> {
        let targets = affected_views(changed);
        let ctx = ViewContext {
            store,
            selection,
            config: &self.config,
            colors: &self.colors,
        };

        for view in &targets {
            match view {
                ViewKind::Trend => surface.draw_trend(&views::trend::build(&ctx)),
                ViewKind::Ranking => surface.draw_ranking(&views::ranking::build(&ctx)),
                ViewKind::Heatmap => surface.draw_heatmap(&views::heatmap::build(&ctx)),
                ViewKind::Map => surface.draw_map(&views::map::build(&ctx)),
            }
        }

        log::debug!(
            "refresh {:?} -> redrew {:?} (metric={}, region={:?}, year={})",
            changed,
            targets,
            selection.metric,
            selection.selected_region,
            selection.selected_year
        );
        targets
    }

    /// Feed a click from any view back into the selection.
    ///
    /// Unknown labels are ignored and produce an empty change set.
    pub fn region_clicked(&self, selection: &mut SelectionState, label: &str) -> ChangedFields {
        match Region::from_label(label) {
            Some(region) => selection.toggle_region(region),
            None => {
                log::warn!("Ignoring click on unknown region label '{label}'");
                ChangedFields::new()
            }
        }
    }
}

impl Default for ViewSynchronizer {
    fn default() -> Self {
        Self::new(DashboardConfig::default(), ColorMap::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_change_only_touches_year_point_views() {
        let targets = affected_views(&ChangedFields::from([StateField::Year]));
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec![ViewKind::Ranking, ViewKind::Map]
        );
    }

    #[test]
    fn metric_and_region_changes_touch_everything() {
        for field in [StateField::Metric, StateField::Region] {
            let targets = affected_views(&ChangedFields::from([field]));
            assert_eq!(targets.len(), 4);
        }
        assert_eq!(affected_views(&StateField::all()).len(), 4);
    }

    #[test]
    fn nothing_changed_means_nothing_redrawn() {
        assert!(affected_views(&ChangedFields::new()).is_empty());
    }
}
