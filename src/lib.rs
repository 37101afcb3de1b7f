//! Linked-view climate dashboard core.
//!
//! Four views (trend, ranking, heatmap, map) share one [`SelectionState`].
//! [`ViewSynchronizer::refresh`] recomputes the views a change affects and
//! hands them to a [`PlotSurface`]; clicks on any view come back through
//! [`ViewSynchronizer::region_clicked`].

pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod sync;
pub mod views;

pub use config::DashboardConfig;
pub use data::model::{ClimateRow, Metric, Region, RowStore};
pub use error::DashboardError;
pub use state::{AppState, ChangedFields, SelectionState, StateField};
pub use sync::{PlotSurface, ViewKind, ViewSynchronizer};
