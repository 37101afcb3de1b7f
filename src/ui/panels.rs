use std::path::Path;

use eframe::egui::{self, Color32, RichText, Ui};

use climate_dash::color::ColorMap;
use climate_dash::data::loader;
use climate_dash::{AppState, ChangedFields, Metric};

// ---------------------------------------------------------------------------
// Top bar – file menu, metric selector, year slider
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar. Returns the selection fields changed by
/// the user this frame.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) -> ChangedFields {
    let mut changed = ChangedFields::new();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                changed.extend(open_file_dialog(state));
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(selection) = state.selection() {
            let current = selection.metric;
            let mut picked = None;
            egui::ComboBox::from_id_salt("metric")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for metric in Metric::ALL {
                        if ui.selectable_label(current == metric, metric.label()).clicked() {
                            picked = Some(metric);
                        }
                    }
                });
            if let Some(metric) = picked {
                changed.extend(state.set_metric(metric));
            }
        }

        if let (Some((min, max)), Some(selection)) = (state.year_bounds(), state.selection()) {
            let mut year = selection.selected_year;
            let selected_region = selection.selected_region;
            let slider = egui::Slider::new(&mut year, min..=max).text("Year");
            if ui.add(slider).changed() {
                changed.extend(state.set_year(year));
            }

            ui.separator();
            let highlight = state.colors.highlight;
            match selected_region {
                Some(region) => ui.label(RichText::new(format!("Selected: {region}")).color(highlight)),
                None => ui.label("All continents"),
            };
        }

        if let Some(session) = &state.session {
            ui.separator();
            ui.label(format!("{} records", session.store.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    changed
}

/// Region colour key shown above the views.
pub fn legend(ui: &mut Ui, colors: &ColorMap) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (name, color) in colors.legend_entries() {
            ui.label(RichText::new("■").color(color));
            ui.label(name);
            ui.add_space(6.0);
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) -> ChangedFields {
    let file = rfd::FileDialog::new()
        .set_title("Open climate data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    match file {
        Some(path) => load_dataset(state, &path),
        None => ChangedFields::new(),
    }
}

/// Load `path` into a fresh session. Failures are logged and shown in the
/// status bar; the current session, if any, stays untouched.
pub fn load_dataset(state: &mut AppState, path: &Path) -> ChangedFields {
    state.loading = true;
    let result = loader::load_file(path).and_then(|store| {
        let rows = store.len();
        let years = store.year_range();
        let changed = state.set_dataset(store)?;
        log::info!("Loaded {rows} records from {} (years {years:?})", path.display());
        Ok(changed)
    });

    match result {
        Ok(changed) => changed,
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
            state.loading = false;
            ChangedFields::new()
        }
    }
}
