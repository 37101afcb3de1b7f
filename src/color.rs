use std::str::FromStr;

use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

use crate::config::DashboardConfig;
use crate::data::model::Region;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Hex parsing
// ---------------------------------------------------------------------------

/// Parse `#rrggbb` (or `rrggbb`) into a colour.
pub fn parse_hex(field: &str, value: &str) -> Result<Color32, DashboardError> {
    let rgb = Srgb::<u8>::from_str(value.trim()).map_err(|_| DashboardError::InvalidColor {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Apply an opacity in `[0, 1]` to a colour.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Region colour mapping
// ---------------------------------------------------------------------------

/// Resolved colours of the dashboard: one per region plus the highlight and
/// neutral colours.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorMap {
    regions: [Color32; 6],
    pub highlight: Color32,
    pub neutral: Color32,
}

impl ColorMap {
    /// Resolve the hex strings of a config.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let mut regions = [Color32::GRAY; 6];
        for (region, slot) in Region::ALL.into_iter().zip(regions.iter_mut()) {
            *slot = parse_hex(region.name(), &config.region_colors[region.index()])?;
        }
        Ok(ColorMap {
            regions,
            highlight: parse_hex("highlight_color", &config.highlight_color)?,
            neutral: parse_hex("neutral_color", &config.neutral_color)?,
        })
    }

    /// Palette colour of a region.
    pub fn color_for(&self, region: Region) -> Color32 {
        self.regions[region.index()]
    }

    /// Legend entries (region label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        Region::ALL
            .into_iter()
            .map(|r| (r.name().to_string(), self.color_for(r)))
            .collect()
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        // The built-in config always parses.
        Self::from_config(&DashboardConfig::default()).unwrap_or(ColorMap {
            regions: [Color32::GRAY; 6],
            highlight: Color32::from_rgb(0xF5, 0x85, 0x18),
            neutral: Color32::GRAY,
        })
    }
}

// ---------------------------------------------------------------------------
// Sequential scale for the heatmap
// ---------------------------------------------------------------------------

/// Cividis control points, evenly spaced over `[0, 1]`.
const CIVIDIS: [(u8, u8, u8); 5] = [
    (0x00, 0x20, 0x4C),
    (0x41, 0x4D, 0x6B),
    (0x7C, 0x7B, 0x78),
    (0xBC, 0xAF, 0x6F),
    (0xFF, 0xE9, 0x45),
];

fn to_linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    srgb.into_color()
}

/// Map `value` within `[min, max]` onto the cividis scale, interpolating in
/// linear RGB.
pub fn cividis(value: f64, min: f64, max: f64) -> Color32 {
    let t = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0) as f32
    } else {
        0.5
    };

    let segments = (CIVIDIS.len() - 1) as f32;
    let pos = t * segments;
    let lo = (pos.floor() as usize).min(CIVIDIS.len() - 2);
    let local = pos - lo as f32;

    let mixed = to_linear(CIVIDIS[lo]).mix(to_linear(CIVIDIS[lo + 1]), local);
    let rgb: Srgb = mixed.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(
            parse_hex("x", "#F58518").unwrap(),
            Color32::from_rgb(0xF5, 0x85, 0x18)
        );
        assert_eq!(
            parse_hex("x", "4c78a8").unwrap(),
            Color32::from_rgb(0x4C, 0x78, 0xA8)
        );
    }

    #[test]
    fn rejects_bad_hex() {
        let err = parse_hex("highlight_color", "orange").unwrap_err();
        assert_eq!(
            err,
            DashboardError::InvalidColor {
                field: "highlight_color".into(),
                value: "orange".into()
            }
        );
    }

    #[test]
    fn config_colors_resolve_per_region() {
        let map = ColorMap::from_config(&DashboardConfig::default()).unwrap();
        assert_eq!(map.color_for(Region::Africa), Color32::from_rgb(0x4C, 0x78, 0xA8));
        assert_eq!(map.highlight, Color32::from_rgb(0xF5, 0x85, 0x18));
        assert_eq!(map.legend_entries().len(), 6);
    }

    #[test]
    fn invalid_region_color_names_the_region() {
        let mut cfg = DashboardConfig::default();
        cfg.region_colors[Region::Oceania.index()] = "zz".into();
        match ColorMap::from_config(&cfg) {
            Err(DashboardError::InvalidColor { field, .. }) => assert_eq!(field, "Oceania"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn cividis_endpoints() {
        assert_eq!(cividis(0.0, 0.0, 1.0), Color32::from_rgb(0x00, 0x20, 0x4C));
        assert_eq!(cividis(1.0, 0.0, 1.0), Color32::from_rgb(0xFF, 0xE9, 0x45));
        // Out-of-range values clamp.
        assert_eq!(cividis(7.0, 0.0, 1.0), cividis(1.0, 0.0, 1.0));
    }
}
