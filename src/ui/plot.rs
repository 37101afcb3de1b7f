use eframe::egui::{self, Align2, Color32, Rect, Sense, TextStyle, Ui, pos2, vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use climate_dash::Region;
use climate_dash::color::{cividis, with_opacity};
use climate_dash::views::{MapView, TrendView};

use super::surface::EguiSurface;

// ---------------------------------------------------------------------------
// Trend (line per region)
// ---------------------------------------------------------------------------

pub fn trend_plot(ui: &mut Ui, surface: &mut EguiSurface, height: f32) {
    ui.strong("Trend by continent");
    let Some(view) = &surface.trend else {
        no_data(ui, height);
        return;
    };

    let clicked = Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label(view.metric.label())
        .height(height)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for s in &view.series {
                let points: PlotPoints = s
                    .points
                    .iter()
                    .map(|&(year, value)| [f64::from(year), value])
                    .collect();
                let line = Line::new(points)
                    .name(s.region.name())
                    .color(with_opacity(s.color, s.opacity))
                    .width(s.width);
                plot_ui.line(line);
            }

            if plot_ui.response().clicked() {
                plot_ui
                    .pointer_coordinate()
                    .and_then(|p| nearest_series(view, p.x, p.y))
            } else {
                None
            }
        })
        .inner;

    if let Some(region) = clicked {
        surface.click(region.name());
    }
}

/// The series whose point at the year closest to `x` lies nearest to `y`.
fn nearest_series(view: &TrendView, x: f64, y: f64) -> Option<Region> {
    view.series
        .iter()
        .filter_map(|s| {
            let (_, value) = s
                .points
                .iter()
                .min_by(|a, b| (f64::from(a.0) - x).abs().total_cmp(&(f64::from(b.0) - x).abs()))?;
            Some((s.region, (value - y).abs()))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(region, _)| region)
}

// ---------------------------------------------------------------------------
// Ranking (horizontal bars, largest delta on top)
// ---------------------------------------------------------------------------

pub fn ranking_chart(ui: &mut Ui, surface: &mut EguiSurface, height: f32) {
    let Some(view) = &surface.ranking else {
        ui.strong("Change since baseline");
        no_data(ui, height);
        return;
    };
    ui.strong(format!(
        "Change {} vs {}",
        view.target_year, view.baseline_year
    ));
    if view.bars.is_empty() {
        no_data(ui, height);
        return;
    }

    let n = view.bars.len();
    let bars: Vec<Bar> = view
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new((n - 1 - i) as f64, b.delta)
                .name(b.region.name())
                .fill(b.color)
        })
        .collect();
    // Axis position p shows bar n-1-p.
    let labels: Vec<&'static str> = view.bars.iter().rev().map(|b| b.region.name()).collect();

    let clicked = Plot::new("ranking_chart")
        .x_axis_label(view.axis_label())
        .height(height)
        .allow_scroll(false)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                labels.get(idx as usize).map(|s| s.to_string()).unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().width(0.6));
            if plot_ui.response().clicked() {
                plot_ui
                    .pointer_coordinate()
                    .and_then(|p| bar_at(n, p.y))
                    .map(|i| view.bars[i].region)
            } else {
                None
            }
        })
        .inner;

    if let Some(region) = clicked {
        surface.click(region.name());
    }
}

/// Index into the ranked bars for a pointer at axis position `y`.
fn bar_at(n: usize, y: f64) -> Option<usize> {
    let pos = y.round();
    if pos < 0.0 || pos >= n as f64 || (y - pos).abs() > 0.4 {
        return None;
    }
    Some(n - 1 - pos as usize)
}

// ---------------------------------------------------------------------------
// Heatmap (region × year)
// ---------------------------------------------------------------------------

const LABEL_WIDTH: f32 = 110.0;
const AXIS_HEIGHT: f32 = 18.0;

pub fn heatmap_grid(ui: &mut Ui, surface: &mut EguiSurface, height: f32) {
    ui.strong("Continent × year");
    let Some(view) = &surface.heatmap else {
        no_data(ui, height);
        return;
    };
    let rows = view.regions.len();
    let cols = view.years.len();
    if rows == 0 || cols == 0 {
        no_data(ui, height);
        return;
    }

    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), height), Sense::click());
    let rect = response.rect;
    let grid = Rect::from_min_max(
        pos2(rect.min.x + LABEL_WIDTH, rect.min.y),
        pos2(rect.max.x, rect.max.y - AXIS_HEIGHT),
    );
    let cell = vec2(grid.width() / cols as f32, grid.height() / rows as f32);
    let font = TextStyle::Small.resolve(ui.style());
    let text_color = ui.style().visuals.text_color();
    let range = view.value_range();

    for (r, region) in view.regions.iter().enumerate() {
        for c in 0..cols {
            let cell_rect = Rect::from_min_size(
                grid.min + vec2(c as f32 * cell.x, r as f32 * cell.y),
                cell,
            )
            .shrink(0.5);
            let color = match (view.cells[r][c], range) {
                (Some(v), Some((lo, hi))) => cividis(v, lo, hi),
                _ => Color32::from_gray(40),
            };
            painter.rect_filled(cell_rect, 0.0, color);
        }
        painter.text(
            pos2(grid.min.x - 5.0, grid.min.y + (r as f32 + 0.5) * cell.y),
            Align2::RIGHT_CENTER,
            region.name(),
            font.clone(),
            text_color,
        );
    }

    // Thin out year labels so they do not overlap.
    let step = ((cols as f32 * 34.0) / grid.width()).ceil().max(1.0) as usize;
    for (c, year) in view.years.iter().enumerate().step_by(step) {
        painter.text(
            pos2(grid.min.x + (c as f32 + 0.5) * cell.x, grid.max.y + 2.0),
            Align2::CENTER_TOP,
            year.to_string(),
            font.clone(),
            text_color,
        );
    }

    if let Some(pos) = response.hover_pos() {
        if let (Some(r), Some(c)) = (grid_index(grid.min.y, cell.y, rows, pos.y), grid_index(grid.min.x, cell.x, cols, pos.x)) {
            let value = view.cells[r][c]
                .map(|v| format!("{v:.3}"))
                .unwrap_or_else(|| "–".to_string());
            painter.text(
                rect.left_bottom(),
                Align2::LEFT_BOTTOM,
                format!("{} {}: {value}", view.regions[r], view.years[c]),
                font,
                text_color,
            );
        }
    }

    let clicked = if response.clicked() {
        response
            .interact_pointer_pos()
            .filter(|p| grid.contains(*p))
            .and_then(|p| grid_index(grid.min.y, cell.y, rows, p.y))
            .map(|r| view.regions[r])
    } else {
        None
    };
    if let Some(region) = clicked {
        surface.click(region.name());
    }
}

/// Row or column of a uniform grid under coordinate `at`.
fn grid_index(origin: f32, size: f32, count: usize, at: f32) -> Option<usize> {
    if size <= 0.0 || at < origin {
        return None;
    }
    let idx = ((at - origin) / size) as usize;
    (idx < count).then_some(idx)
}

// ---------------------------------------------------------------------------
// Map (country tiles grouped by region)
// ---------------------------------------------------------------------------

const TILE_SIZE: egui::Vec2 = egui::Vec2 { x: 104.0, y: 20.0 };
const HEADER_HEIGHT: f32 = 18.0;
const GAP: f32 = 3.0;

/// A laid-out tile: the region header (`country == None`) or one country.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tile {
    rect: Rect,
    group: usize,
    country: Option<usize>,
}

/// Flow each group's countries into rows under a region header.
fn layout_tiles(view: &MapView, area: Rect) -> Vec<Tile> {
    let per_row = ((area.width() + GAP) / (TILE_SIZE.x + GAP)).floor().max(1.0) as usize;
    let mut tiles = Vec::new();
    let mut y = area.min.y;

    for (g, group) in view.groups.iter().enumerate() {
        tiles.push(Tile {
            rect: Rect::from_min_size(pos2(area.min.x, y), vec2(area.width(), HEADER_HEIGHT)),
            group: g,
            country: None,
        });
        y += HEADER_HEIGHT;

        for (k, _) in group.countries.iter().enumerate() {
            let col = k % per_row;
            let row = k / per_row;
            let min = pos2(
                area.min.x + col as f32 * (TILE_SIZE.x + GAP),
                y + row as f32 * (TILE_SIZE.y + GAP),
            );
            tiles.push(Tile {
                rect: Rect::from_min_size(min, TILE_SIZE),
                group: g,
                country: Some(k),
            });
        }
        let rows = group.countries.len().div_ceil(per_row);
        y += rows as f32 * (TILE_SIZE.y + GAP) + GAP;
    }
    tiles
}

pub fn map_tiles(ui: &mut Ui, surface: &mut EguiSurface, height: f32) {
    let Some(view) = &surface.map else {
        ui.strong("Countries");
        no_data(ui, height);
        return;
    };
    ui.strong(format!("Countries reporting in {}", view.year));
    if view.groups.is_empty() {
        no_data(ui, height);
        return;
    }

    let (response, painter) =
        ui.allocate_painter(vec2(ui.available_width(), height), Sense::click());
    let tiles = layout_tiles(view, response.rect);
    let font = TextStyle::Small.resolve(ui.style());
    let text_color = ui.style().visuals.text_color();

    for tile in &tiles {
        let group = &view.groups[tile.group];
        match tile.country {
            None => {
                painter.text(
                    tile.rect.left_center(),
                    Align2::LEFT_CENTER,
                    group.region.name(),
                    font.clone(),
                    with_opacity(text_color, group.opacity),
                );
            }
            Some(k) => {
                painter.rect_filled(tile.rect, 3.0, with_opacity(group.color, group.opacity));
                painter.text(
                    tile.rect.center(),
                    Align2::CENTER_CENTER,
                    &group.countries[k],
                    font.clone(),
                    with_opacity(Color32::BLACK, group.opacity),
                );
            }
        }
    }

    let clicked = if response.clicked() {
        response
            .interact_pointer_pos()
            .and_then(|p| tiles.iter().find(|t| t.rect.contains(p)))
            .map(|t| view.groups[t.group].region)
    } else {
        None
    };
    if let Some(region) = clicked {
        surface.click(region.name());
    }
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

fn no_data(ui: &mut Ui, height: f32) {
    ui.allocate_ui(vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No data");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_dash::Metric;
    use climate_dash::views::{MapGroup, TrendSeries};

    fn series(region: Region, points: Vec<(i32, f64)>) -> TrendSeries {
        TrendSeries {
            region,
            points,
            color: Color32::WHITE,
            opacity: 1.0,
            width: 2.0,
        }
    }

    #[test]
    fn nearest_series_uses_closest_year() {
        let view = TrendView {
            metric: Metric::Temperature,
            series: vec![
                series(Region::Asia, vec![(2000, 10.0), (2001, 20.0)]),
                series(Region::Europe, vec![(2000, 18.0), (2001, 12.0)]),
            ],
        };
        assert_eq!(nearest_series(&view, 2000.1, 17.0), Some(Region::Europe));
        assert_eq!(nearest_series(&view, 2000.9, 19.0), Some(Region::Asia));
    }

    #[test]
    fn bar_positions_map_top_down() {
        // Three bars: index 0 is drawn at position 2 (top).
        assert_eq!(bar_at(3, 2.1), Some(0));
        assert_eq!(bar_at(3, 0.0), Some(2));
        assert_eq!(bar_at(3, 1.5), None);
        assert_eq!(bar_at(3, 3.0), None);
        assert_eq!(bar_at(3, -0.2), Some(2));
    }

    #[test]
    fn grid_index_bounds() {
        assert_eq!(grid_index(10.0, 5.0, 4, 12.0), Some(0));
        assert_eq!(grid_index(10.0, 5.0, 4, 29.9), Some(3));
        assert_eq!(grid_index(10.0, 5.0, 4, 30.0), None);
        assert_eq!(grid_index(10.0, 5.0, 4, 9.0), None);
    }

    #[test]
    fn tiles_start_each_group_on_a_new_line() {
        let view = MapView {
            metric: Metric::Temperature,
            year: 2020,
            groups: vec![
                MapGroup {
                    region: Region::Africa,
                    countries: vec!["Chad".into(), "Kenya".into(), "Mali".into()],
                    color: Color32::RED,
                    opacity: 1.0,
                },
                MapGroup {
                    region: Region::Asia,
                    countries: vec!["Japan".into()],
                    color: Color32::BLUE,
                    opacity: 0.25,
                },
            ],
        };
        // Room for two tiles per row.
        let area = Rect::from_min_size(pos2(0.0, 0.0), vec2(2.0 * TILE_SIZE.x + GAP, 400.0));
        let tiles = layout_tiles(&view, area);
        assert_eq!(tiles.len(), 2 + 3 + 1);

        let kenya = tiles[2];
        let mali = tiles[3];
        assert_eq!(kenya.country, Some(1));
        assert!(mali.rect.min.y > kenya.rect.min.y);

        let asia_header = tiles[4];
        assert_eq!((asia_header.group, asia_header.country), (1, None));
        assert!(asia_header.rect.min.y >= mali.rect.max.y);
    }
}
