use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::model::{Metric, Region, RowStore};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Change tracking
// ---------------------------------------------------------------------------

/// A field of [`SelectionState`] that a mutation may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateField {
    Metric,
    Region,
    Year,
}

impl StateField {
    /// Every field; used for the initial render.
    pub fn all() -> ChangedFields {
        [StateField::Metric, StateField::Region, StateField::Year]
            .into_iter()
            .collect()
    }
}

/// The fields a mutation changed, handed to the view synchronizer.
pub type ChangedFields = BTreeSet<StateField>;

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// The single shared selection every view reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub metric: Metric,
    /// `None` means every region is emphasized equally.
    pub selected_region: Option<Region>,
    pub selected_year: i32,
}

impl SelectionState {
    /// Initial selection for a freshly loaded store: latest year, no region.
    pub fn for_store(store: &RowStore, metric: Metric) -> Result<Self, DashboardError> {
        let (_, max_year) = store.year_range().ok_or(DashboardError::EmptyDataset)?;
        Ok(SelectionState {
            metric,
            selected_region: None,
            selected_year: max_year,
        })
    }

    /// Replace the metric. Region and year are untouched.
    pub fn set_metric(&mut self, metric: Metric) -> ChangedFields {
        self.metric = metric;
        ChangedFields::from([StateField::Metric])
    }

    /// Strict toggle: clicking the selected region clears the selection,
    /// clicking any other region replaces it.
    pub fn toggle_region(&mut self, region: Region) -> ChangedFields {
        self.selected_region = if self.selected_region == Some(region) {
            None
        } else {
            Some(region)
        };
        ChangedFields::from([StateField::Region])
    }

    /// Replace the year. The slider clamps to the observed range; a year
    /// outside it simply yields empty year-point views.
    pub fn set_year(&mut self, year: i32) -> ChangedFields {
        self.selected_year = year;
        ChangedFields::from([StateField::Year])
    }

    /// Whether `region` is drawn with full emphasis.
    pub fn is_emphasized(&self, region: Region) -> bool {
        self.selected_region.map_or(true, |r| r == region)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A loaded dataset together with its selection.
///
/// Both are created together, so no view can be computed before the store
/// is populated.
#[derive(Debug, Clone)]
pub struct Session {
    pub store: RowStore,
    pub selection: SelectionState,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset and selection (None until a file is loaded).
    pub session: Option<Session>,

    pub config: DashboardConfig,

    /// Colours resolved from `config`.
    pub colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: None,
            config: DashboardConfig::default(),
            colors: ColorMap::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// State for a validated config.
    pub fn with_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        let colors = ColorMap::from_config(&config)?;
        Ok(Self {
            config,
            colors,
            ..Self::default()
        })
    }

    /// Ingest a newly loaded dataset and start a fresh selection.
    ///
    /// On error the previous session stays active.
    pub fn set_dataset(&mut self, store: RowStore) -> Result<ChangedFields, DashboardError> {
        let selection = SelectionState::for_store(&store, self.config.default_metric)?;
        self.session = Some(Session { store, selection });
        self.status_message = None;
        self.loading = false;
        Ok(StateField::all())
    }

    /// Observed year bounds for the slider.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        self.session.as_ref().and_then(|s| s.store.year_range())
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.session.as_ref().map(|s| &s.selection)
    }

    pub fn set_metric(&mut self, metric: Metric) -> ChangedFields {
        match &mut self.session {
            Some(s) => s.selection.set_metric(metric),
            None => ChangedFields::new(),
        }
    }

    pub fn set_year(&mut self, year: i32) -> ChangedFields {
        match &mut self.session {
            Some(s) => s.selection.set_year(year),
            None => ChangedFields::new(),
        }
    }
}
