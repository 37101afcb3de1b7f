use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Region – the categorical dimension shared by every view
// ---------------------------------------------------------------------------

/// One of the six continent-level groupings.
///
/// Variants are declared in alphabetical order of their display names, so the
/// derived `Ord` matches lexicographic ordering by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Asia,
    Europe,
    NorthAmerica,
    Oceania,
    SouthAmerica,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Africa,
        Region::Asia,
        Region::Europe,
        Region::NorthAmerica,
        Region::Oceania,
        Region::SouthAmerica,
    ];

    /// Display name, also used as the label carried by click events.
    pub fn name(self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::NorthAmerica => "North America",
            Region::Oceania => "Oceania",
            Region::SouthAmerica => "South America",
        }
    }

    /// Position in [`Region::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parse a continent label. Matching is exact; labels outside the fixed
    /// set yield `None`.
    pub fn from_label(label: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.name() == label)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Metric – the six numeric observation types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Temperature,
    Co2,
    SeaLevel,
    Precipitation,
    Humidity,
    WindSpeed,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Temperature,
        Metric::Co2,
        Metric::SeaLevel,
        Metric::Precipitation,
        Metric::Humidity,
        Metric::WindSpeed,
    ];

    /// Stable id, matching the dataset's column names.
    pub fn id(self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Co2 => "co2",
            Metric::SeaLevel => "sea_level",
            Metric::Precipitation => "precipitation",
            Metric::Humidity => "humidity",
            Metric::WindSpeed => "wind_speed",
        }
    }

    /// Axis label with unit.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature (°C)",
            Metric::Co2 => "CO2 Emissions (ppm)",
            Metric::SeaLevel => "Sea Level Rise (mm)",
            Metric::Precipitation => "Precipitation (mm)",
            Metric::Humidity => "Humidity (%)",
            Metric::WindSpeed => "Wind Speed (km/h)",
        }
    }

    /// Column header used by the raw (pre-conversion) CSV export.
    pub fn source_header(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Co2 => "CO2 Emissions",
            Metric::SeaLevel => "Sea Level Rise",
            Metric::Precipitation => "Precipitation",
            Metric::Humidity => "Humidity",
            Metric::WindSpeed => "Wind Speed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Metric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.id() == s.trim())
            .ok_or_else(|| DashboardError::UnknownMetric(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ClimateRow – one observation
// ---------------------------------------------------------------------------

/// Metric values of a single row, indexed by [`Metric`].
///
/// Non-finite entries mean "missing for this metric"; the rest of the row is
/// still usable for the other metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricValues([f64; 6]);

impl Default for MetricValues {
    fn default() -> Self {
        MetricValues([f64::NAN; 6])
    }
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        self.0[metric.index()] = value;
    }

    /// The value for `metric`, or `None` when it is not a finite number.
    pub fn finite(&self, metric: Metric) -> Option<f64> {
        let v = self.get(metric);
        v.is_finite().then_some(v)
    }
}

/// A single observation (one record of the source dataset).
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateRow {
    pub year: Option<i32>,
    /// Parsed continent; `None` when the label is outside the fixed set.
    pub region: Option<Region>,
    /// Raw continent label as it appeared in the source.
    pub continent: String,
    /// Used only for map placement.
    pub country: String,
    pub month: Option<u32>,
    pub date: Option<String>,
    pub metrics: MetricValues,
}

impl ClimateRow {
    /// Convenience constructor with every metric missing.
    pub fn new(year: Option<i32>, continent: &str, country: &str) -> Self {
        ClimateRow {
            year,
            region: Region::from_label(continent),
            continent: continent.to_string(),
            country: country.to_string(),
            month: None,
            date: None,
            metrics: MetricValues::default(),
        }
    }

    /// Builder-style setter used by loaders and tests.
    pub fn with(mut self, metric: Metric, value: f64) -> Self {
        self.metrics.set(metric, value);
        self
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.metrics.finite(metric)
    }
}

// ---------------------------------------------------------------------------
// RowStore – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct RowStore {
    rows: Vec<ClimateRow>,
    year_range: Option<(i32, i32)>,
}

impl RowStore {
    /// Build the store and its year index from loaded rows.
    pub fn from_rows(rows: Vec<ClimateRow>) -> Self {
        let year_range = rows
            .iter()
            .filter_map(|r| r.year)
            .fold(None, |acc: Option<(i32, i32)>, y| match acc {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            });
        RowStore { rows, year_range }
    }

    pub fn rows(&self) -> &[ClimateRow] {
        &self.rows
    }

    /// Observed `(min, max)` year, or `None` if no row carries a year.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        self.year_range
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_order_matches_name_order() {
        let mut by_name = Region::ALL.to_vec();
        by_name.sort_by_key(|r| r.name());
        assert_eq!(by_name, Region::ALL.to_vec());
    }

    #[test]
    fn region_labels_round_trip_and_reject_unknown() {
        assert_eq!(Region::from_label("North America"), Some(Region::NorthAmerica));
        assert_eq!(Region::from_label(" Oceania "), None);
        assert_eq!(Region::from_label("Antarctica"), None);
        assert_eq!(Region::from_label("asia"), None);
    }

    #[test]
    fn metric_ids_parse() {
        assert_eq!("co2".parse::<Metric>(), Ok(Metric::Co2));
        assert_eq!(
            "ozone".parse::<Metric>(),
            Err(DashboardError::UnknownMetric("ozone".into()))
        );
    }

    #[test]
    fn non_finite_metric_is_missing() {
        let row = ClimateRow::new(Some(2000), "Asia", "Japan")
            .with(Metric::Temperature, 12.0)
            .with(Metric::Co2, f64::INFINITY);
        assert_eq!(row.value(Metric::Temperature), Some(12.0));
        assert_eq!(row.value(Metric::Co2), None);
        assert_eq!(row.value(Metric::Humidity), None);
    }

    #[test]
    fn year_range_ignores_missing_years() {
        let store = RowStore::from_rows(vec![
            ClimateRow::new(Some(2005), "Asia", "Japan"),
            ClimateRow::new(None, "Asia", "Japan"),
            ClimateRow::new(Some(1999), "Europe", "France"),
        ]);
        assert_eq!(store.year_range(), Some((1999, 2005)));
        assert_eq!(store.len(), 3);

        assert_eq!(RowStore::default().year_range(), None);
    }
}
