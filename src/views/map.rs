use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;

use super::ViewContext;
use crate::data::filter::observations_in_year;
use crate::data::model::{Metric, Region};

/// Countries of one region, drawn with one colour and opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGroup {
    pub region: Region,
    /// De-duplicated, sorted country names.
    pub countries: Vec<String>,
    pub color: Color32,
    pub opacity: f32,
}

/// Choropleth groups for the selected year.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub metric: Metric,
    pub year: i32,
    pub groups: Vec<MapGroup>,
}

impl MapView {
    pub fn group_for(&self, region: Region) -> Option<&MapGroup> {
        self.groups.iter().find(|g| g.region == region)
    }
}

/// Build the map payload.
///
/// Only countries with a valid value for `(selected_year, metric)` are
/// placed; a region left with no country is not drawn at all.
pub fn build(ctx: &ViewContext<'_>) -> MapView {
    let metric = ctx.selection.metric;
    let year = ctx.selection.selected_year;

    let mut countries: BTreeMap<Region, BTreeSet<&str>> = BTreeMap::new();
    for obs in observations_in_year(ctx.store.rows(), metric, year) {
        countries
            .entry(obs.region)
            .or_default()
            .insert(obs.row.country.as_str());
    }

    let groups = countries
        .into_iter()
        .map(|(region, names)| MapGroup {
            region,
            countries: names.into_iter().map(str::to_string).collect(),
            color: if ctx.is_selected(region) {
                ctx.colors.highlight
            } else {
                ctx.colors.color_for(region)
            },
            opacity: ctx.opacity_for(region),
        })
        .collect();

    MapView {
        metric,
        year,
        groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ClimateRow, RowStore};
    use crate::views::fixtures::Fixture;

    #[test]
    fn groups_only_regions_with_data_in_the_year() {
        let fx = Fixture::new(Metric::Temperature);
        let view = build(&fx.ctx());

        assert_eq!(view.year, 2002);
        let regions: Vec<Region> = view.groups.iter().map(|g| g.region).collect();
        assert_eq!(regions, vec![Region::Asia, Region::Europe]);
        assert_eq!(view.group_for(Region::Asia).unwrap().countries, vec!["China", "Japan"]);
        assert!(view.groups.iter().all(|g| g.opacity == 1.0));
        assert!(view.groups.iter().all(|g| g.color == fx.colors.color_for(g.region)));
    }

    #[test]
    fn selected_region_highlighted_others_dimmed_in_palette() {
        let mut fx = Fixture::new(Metric::Temperature);
        fx.selection.toggle_region(Region::Asia);
        let view = build(&fx.ctx());

        let asia = view.group_for(Region::Asia).unwrap();
        assert_eq!((asia.color, asia.opacity), (fx.colors.highlight, 1.0));
        let europe = view.group_for(Region::Europe).unwrap();
        assert_eq!((europe.color, europe.opacity), (fx.colors.color_for(Region::Europe), 0.25));
    }

    #[test]
    fn duplicate_countries_collapse_and_invalid_values_are_skipped() {
        let store = RowStore::from_rows(vec![
            ClimateRow::new(Some(2020), "Africa", "Kenya").with(Metric::Humidity, 60.0),
            ClimateRow::new(Some(2020), "Africa", "Kenya").with(Metric::Humidity, 62.0),
            ClimateRow::new(Some(2020), "Africa", "Chad").with(Metric::Humidity, f64::NAN),
            ClimateRow::new(Some(2020), "Oceania", "Fiji").with(Metric::Humidity, f64::NAN),
        ]);
        let view = build(&Fixture::with_store(store, Metric::Humidity).ctx());

        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].countries, vec!["Kenya"]);
    }
}
