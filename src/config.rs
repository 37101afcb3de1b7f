use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::model::Metric;
use crate::error::DashboardError;

/// Environment variable naming an optional JSON file with config overrides.
pub const CONFIG_ENV_VAR: &str = "CLIMATE_DASH_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Constants that shape how views are encoded.
///
/// Every field has a default, so a config file only needs to list the fields
/// it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Reference year the ranking view measures change against.
    pub baseline_year: i32,

    /// Metric selected when a dataset is loaded.
    pub default_metric: Metric,

    /// Colour of the selected region in every view.
    pub highlight_color: String,

    /// Colour of unselected ranking bars.
    pub neutral_color: String,

    /// Palette colours, one per region in `Region::ALL` order.
    pub region_colors: [String; 6],

    pub selected_opacity: f32,
    pub dimmed_opacity: f32,

    /// Trend line widths.
    pub selected_width: f32,
    pub dimmed_width: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            baseline_year: 2000,
            default_metric: Metric::Temperature,
            highlight_color: "#F58518".into(),
            neutral_color: "#9CA3AF".into(),
            region_colors: [
                "#4C78A8".into(), // Africa
                "#B279A2".into(), // Asia
                "#72B7B2".into(), // Europe
                "#9D755D".into(), // North America
                "#7F7F7F".into(), // Oceania
                "#F2CF5B".into(), // South America
            ],
            selected_opacity: 1.0,
            dimmed_opacity: 0.25,
            selected_width: 4.0,
            dimmed_width: 2.0,
        }
    }
}

impl DashboardConfig {
    /// Read overrides from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Override the default metric by id (`co2`, `sea_level`, ...).
    pub fn set_default_metric(&mut self, id: &str) -> Result<(), DashboardError> {
        self.default_metric = id.parse()?;
        Ok(())
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or use the defaults
    /// when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = Path::new(&path);
                log::info!("Loading dashboard config from {}", path.display());
                Self::from_json_file(path)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: DashboardConfig =
            serde_json::from_str(r#"{ "baseline_year": 1990, "default_metric": "sea_level" }"#)
                .unwrap();
        assert_eq!(cfg.baseline_year, 1990);
        assert_eq!(cfg.default_metric, Metric::SeaLevel);
        assert_eq!(cfg.highlight_color, DashboardConfig::default().highlight_color);
        assert_eq!(cfg.dimmed_opacity, 0.25);
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, r##"{ "highlight_color": "#FF0000" }"##).unwrap();

        let cfg = DashboardConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.highlight_color, "#FF0000");
        assert_eq!(cfg.baseline_year, 2000);
    }

    #[test]
    fn default_metric_override_by_id() {
        let mut cfg = DashboardConfig::default();
        cfg.set_default_metric("wind_speed").unwrap();
        assert_eq!(cfg.default_metric, Metric::WindSpeed);

        assert_eq!(
            cfg.set_default_metric("ozone"),
            Err(DashboardError::UnknownMetric("ozone".into()))
        );
        assert_eq!(cfg.default_metric, Metric::WindSpeed);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dash.json");
        std::fs::write(&path, "{ baseline_year: ").unwrap();
        assert!(DashboardConfig::from_json_file(&path).is_err());
    }
}
