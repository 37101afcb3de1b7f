use super::model::{ClimateRow, Metric, Region};

// ---------------------------------------------------------------------------
// Validity predicate shared by every aggregation
// ---------------------------------------------------------------------------

/// A row that survived filtering for one metric.
#[derive(Debug, Clone, Copy)]
pub struct ValidObservation<'a> {
    pub year: i32,
    pub region: Region,
    pub value: f64,
    pub row: &'a ClimateRow,
}

/// Check one row against the filtering rule for `metric`.
///
/// A row passes when:
/// * it carries a year,
/// * its continent is one of the six known regions,
/// * its value for `metric` is a finite number.
///
/// Validity is per metric: the same row may pass for temperature and fail
/// for CO2.
pub fn observe(row: &ClimateRow, metric: Metric) -> Option<ValidObservation<'_>> {
    Some(ValidObservation {
        year: row.year?,
        region: row.region?,
        value: row.value(metric)?,
        row,
    })
}

/// Iterate the observations of `rows` that are valid for `metric`.
pub fn valid_observations(
    rows: &[ClimateRow],
    metric: Metric,
) -> impl Iterator<Item = ValidObservation<'_>> + '_ {
    rows.iter().filter_map(move |row| observe(row, metric))
}

/// Valid observations restricted to a single year.
pub fn observations_in_year(
    rows: &[ClimateRow],
    metric: Metric,
    year: i32,
) -> impl Iterator<Item = ValidObservation<'_>> + '_ {
    valid_observations(rows, metric).filter(move |obs| obs.year == year)
}

/// Running sum/count used to compute an arithmetic mean.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` for an empty group, never zero or NaN.
    pub(crate) fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_year_unknown_region_and_non_finite_value() {
        let rows = vec![
            ClimateRow::new(None, "Asia", "Japan").with(Metric::Temperature, 1.0),
            ClimateRow::new(Some(2000), "Atlantis", "Nowhere").with(Metric::Temperature, 1.0),
            ClimateRow::new(Some(2000), "Asia", "Japan").with(Metric::Temperature, f64::NAN),
            ClimateRow::new(Some(2000), "Asia", "China").with(Metric::Temperature, 3.0),
        ];
        let kept: Vec<_> = valid_observations(&rows, Metric::Temperature).collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].row.country, "China");
        assert_eq!(kept[0].value, 3.0);
    }

    #[test]
    fn validity_is_per_metric() {
        let row = ClimateRow::new(Some(2000), "Europe", "France")
            .with(Metric::Temperature, 11.0)
            .with(Metric::Co2, f64::NAN);
        assert!(observe(&row, Metric::Temperature).is_some());
        assert!(observe(&row, Metric::Co2).is_none());
    }

    #[test]
    fn empty_accumulator_has_no_mean() {
        let mut acc = MeanAccumulator::default();
        assert_eq!(acc.mean(), None);
        acc.push(2.0);
        acc.push(4.0);
        assert_eq!(acc.mean(), Some(3.0));
    }
}
