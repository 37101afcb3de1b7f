mod app;
mod ui;

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use app::ClimateDashApp;
use climate_dash::{AppState, DashboardConfig};
use eframe::egui;

/// Apply `[--metric <id>] [FILE]` to `config`, returning the dataset path.
fn apply_args(
    config: &mut DashboardConfig,
    args: impl IntoIterator<Item = OsString>,
) -> Result<Option<PathBuf>> {
    let mut file = None;
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--metric" {
            let id = args.next().context("--metric needs a metric id")?;
            let id = id.to_str().context("metric id is not valid UTF-8")?;
            config.set_default_metric(id)?;
        } else if file.is_none() {
            file = Some(PathBuf::from(arg));
        }
    }
    Ok(file)
}

fn main() -> eframe::Result {
    env_logger::init();

    // Config problems fall back to the defaults rather than blocking start-up.
    let mut config = DashboardConfig::from_env().unwrap_or_else(|e| {
        log::error!("Invalid dashboard config, using defaults: {e:#}");
        DashboardConfig::default()
    });
    let initial_file = apply_args(&mut config, std::env::args_os().skip(1)).unwrap_or_else(|e| {
        log::error!("Ignoring command line: {e:#}");
        None
    });
    let state = AppState::with_config(config).unwrap_or_else(|e| {
        log::error!("Invalid dashboard config, using defaults: {e}");
        AppState::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Climate Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(ClimateDashApp::new(state, initial_file)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_dash::{DashboardError, Metric};

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn metric_flag_and_path() {
        let mut config = DashboardConfig::default();
        let file = apply_args(&mut config, args(&["--metric", "co2", "data.json"])).unwrap();
        assert_eq!(config.default_metric, Metric::Co2);
        assert_eq!(file, Some(PathBuf::from("data.json")));
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let mut config = DashboardConfig::default();
        let err = apply_args(&mut config, args(&["--metric", "ozone"])).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DashboardError>(),
            Some(&DashboardError::UnknownMetric("ozone".into()))
        );
        assert_eq!(config.default_metric, Metric::Temperature);
    }

    #[test]
    fn no_arguments() {
        let mut config = DashboardConfig::default();
        assert_eq!(apply_args(&mut config, args(&[])).unwrap(), None);
    }
}
