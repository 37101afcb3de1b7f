/// View layer: per-view payloads computed from the store and the selection.
///
/// Architecture:
/// ```text
///   RowStore + SelectionState + DashboardConfig
///        │
///        ▼
///   ┌──────────────┐
///   │ ViewContext   │  borrowed inputs of one render pass
///   └──────────────┘
///        │
///        ├──► trend    lines per region, emphasis by opacity/width
///        ├──► ranking  bars by descending delta vs. baseline year
///        ├──► heatmap  region × year grid, unselected rows masked
///        └──► map      country groups per region for the selected year
/// ```
///
/// Payloads are recomputed from scratch on every pass; nothing is cached.
pub mod heatmap;
pub mod map;
pub mod ranking;
pub mod trend;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::{Region, RowStore};
use crate::state::SelectionState;

pub use heatmap::HeatmapView;
pub use map::{MapGroup, MapView};
pub use ranking::{RankingBar, RankingView};
pub use trend::{TrendSeries, TrendView};

/// Everything a view builder reads during one render pass.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub store: &'a RowStore,
    pub selection: &'a SelectionState,
    pub config: &'a DashboardConfig,
    pub colors: &'a ColorMap,
}

impl ViewContext<'_> {
    /// Opacity for a region under the current selection.
    pub(crate) fn opacity_for(&self, region: Region) -> f32 {
        if self.selection.is_emphasized(region) {
            self.config.selected_opacity
        } else {
            self.config.dimmed_opacity
        }
    }

    /// Whether `region` is the explicitly selected one (not merely
    /// emphasized because nothing is selected).
    pub(crate) fn is_selected(&self, region: Region) -> bool {
        self.selection.selected_region == Some(region)
    }
}
