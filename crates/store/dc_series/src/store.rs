use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools as _;
use jiff::civil::Date;

use crate::{Series, SeriesId};

/// All series imported so far, in import order.
///
/// The store is a plain value: importing, removing and clearing return a new store
/// instead of mutating shared state. What is shown is decided by [`select_active`].
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SeriesStore {
    series: Vec<Series>,
}

impl SeriesStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the result of one import. Concatenation is the only merge there is.
    #[must_use]
    pub fn with_imported(mut self, imported: impl IntoIterator<Item = Series>) -> Self {
        self.series.extend(imported);
        self
    }

    /// The store without the series with the given id.
    #[must_use]
    pub fn without(mut self, id: SeriesId) -> Self {
        self.series.retain(|series| series.id != id);
        self
    }

    #[must_use]
    pub fn cleared(self) -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    pub fn get(&self, id: SeriesId) -> Option<&Series> {
        self.series.iter().find(|series| series.id == id)
    }

    /// Every date any series is on, ascending.
    pub fn available_dates(&self) -> Vec<Date> {
        self.series
            .iter()
            .map(|series| series.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The date to show when the user has not picked one: the date of the first series
    /// of the first import.
    pub fn default_date(&self) -> Option<Date> {
        self.series.first().map(|series| series.date)
    }

    /// For every dimension key, all the values it takes, sorted.
    pub fn dimension_values(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for series in &self.series {
            for (key, value) in &series.dimensions {
                values.entry(key.clone()).or_default().insert(value.clone());
            }
        }
        values
    }

    /// Distinct metric names, in order of first appearance.
    pub fn metric_names(&self) -> Vec<&str> {
        self.series
            .iter()
            .map(|series| series.metric_name.as_str())
            .unique()
            .collect()
    }
}

impl<'a> IntoIterator for &'a SeriesStore {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Series> for SeriesStore {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}

// ----------------------------------------------------------------------------

/// What the user wants to look at. An empty set means "no restriction".
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct SeriesFilter {
    pub dates: BTreeSet<Date>,

    /// Allowed values per dimension key.
    ///
    /// A series that does not have a key at all is not affected by that key's filter.
    pub dimensions: BTreeMap<String, BTreeSet<String>>,

    pub metrics: BTreeSet<String>,
}

impl SeriesFilter {
    /// Only the given date.
    pub fn on_date(date: Date) -> Self {
        Self {
            dates: std::iter::once(date).collect(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions
            .entry(key.into())
            .or_default()
            .insert(value.into());
        self
    }

    #[must_use]
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metrics.insert(metric.into());
        self
    }

    pub fn matches(&self, series: &Series) -> bool {
        if !self.dates.is_empty() && !self.dates.contains(&series.date) {
            return false;
        }

        if !self.metrics.is_empty() && !self.metrics.contains(&series.metric_name) {
            return false;
        }

        self.dimensions.iter().all(|(key, allowed)| {
            match series.dimensions.get(key) {
                Some(value) => allowed.is_empty() || allowed.contains(value),
                None => true,
            }
        })
    }
}

/// The series to display, in store order.
///
/// Pure: the same store and filter always give the same selection.
pub fn select_active<'a>(store: &'a SeriesStore, filter: &SeriesFilter) -> Vec<&'a Series> {
    store.iter().filter(|series| filter.matches(series)).collect()
}
