use std::path::PathBuf;

use eframe::egui;

use climate_dash::{AppState, ChangedFields, ViewSynchronizer};

use crate::ui::surface::EguiSurface;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ClimateDashApp {
    pub state: AppState,
    sync: ViewSynchronizer,
    surface: EguiSurface,
}

impl ClimateDashApp {
    pub fn new(state: AppState, initial_file: Option<PathBuf>) -> Self {
        let sync = ViewSynchronizer::new(state.config.clone(), state.colors.clone());
        let mut app = Self {
            state,
            sync,
            surface: EguiSurface::default(),
        };
        if let Some(path) = initial_file {
            let changed = panels::load_dataset(&mut app.state, &path);
            app.refresh(&changed);
        }
        app
    }

    /// Push the views affected by `changed` to the surface.
    fn refresh(&mut self, changed: &ChangedFields) {
        if changed.is_empty() {
            return;
        }
        let Some(session) = &self.state.session else {
            return;
        };
        self.sync
            .refresh(&session.store, &session.selection, changed, &mut self.surface);
    }

    /// Route a click collected while painting back into the selection.
    fn handle_click(&mut self) {
        let Some(label) = self.surface.take_click() else {
            return;
        };
        let changed = match &mut self.state.session {
            Some(session) => self.sync.region_clicked(&mut session.selection, &label),
            None => ChangedFields::new(),
        };
        self.refresh(&changed);
    }
}

impl eframe::App for ClimateDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar and selection controls ----
        let changed = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &mut self.state))
            .inner;
        self.refresh(&changed);

        // ---- Central panel: 2 × 2 linked views ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.session.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a climate dataset to begin  (File → Open…)");
                });
                return;
            }

            panels::legend(ui, &self.state.colors);
            let height = (ui.available_height() / 2.0 - 40.0).max(120.0);
            let surface = &mut self.surface;
            ui.columns(2, |columns| {
                plot::trend_plot(&mut columns[0], surface, height);
                columns[0].add_space(8.0);
                plot::heatmap_grid(&mut columns[0], surface, height);

                plot::ranking_chart(&mut columns[1], surface, height);
                columns[1].add_space(8.0);
                plot::map_tiles(&mut columns[1], surface, height);
            });
        });

        self.handle_click();
    }
}
