use thiserror::Error;

/// Errors raised by the dashboard core.
///
/// I/O and parse failures in the loader stay `anyhow::Error`; these are the
/// preconditions the core itself checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    /// The dataset contains no row with a usable year, so no selection can
    /// be initialised.
    #[error("dataset contains no rows with a valid year")]
    EmptyDataset,

    #[error("unknown metric id: {0}")]
    UnknownMetric(String),

    #[error("invalid colour '{value}' for {field}")]
    InvalidColor { field: String, value: String },
}
