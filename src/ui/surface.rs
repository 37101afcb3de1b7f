use climate_dash::PlotSurface;
use climate_dash::views::{HeatmapView, MapView, RankingView, TrendView};

// ---------------------------------------------------------------------------
// egui plotting surface
// ---------------------------------------------------------------------------

/// Keeps the last payload dispatched to each view until it is replaced.
///
/// egui redraws every frame, so "drawing" here means storing the payload
/// the panels paint from. Clicks picked up while painting wait in
/// `pending_click` for the app to feed back into the selection.
#[derive(Default)]
pub struct EguiSurface {
    pub trend: Option<TrendView>,
    pub ranking: Option<RankingView>,
    pub heatmap: Option<HeatmapView>,
    pub map: Option<MapView>,
    pending_click: Option<String>,
}

impl EguiSurface {
    /// Record a click on a region label. The first click of a frame wins.
    pub fn click(&mut self, label: &str) {
        if self.pending_click.is_none() {
            self.pending_click = Some(label.to_string());
        }
    }

    pub fn take_click(&mut self) -> Option<String> {
        self.pending_click.take()
    }
}

impl PlotSurface for EguiSurface {
    fn draw_trend(&mut self, view: &TrendView) {
        self.trend = Some(view.clone());
    }

    fn draw_ranking(&mut self, view: &RankingView) {
        self.ranking = Some(view.clone());
    }

    fn draw_heatmap(&mut self, view: &HeatmapView) {
        self.heatmap = Some(view.clone());
    }

    fn draw_map(&mut self, view: &MapView) {
        self.map = Some(view.clone());
    }
}
