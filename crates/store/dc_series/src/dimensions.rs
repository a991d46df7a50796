use indexmap::IndexMap;
use itertools::Itertools as _;

/// The grouping key of a [`DimensionSet`] without any entries.
pub const DEFAULT_DIMENSION_KEY: &str = "default";

/// Categorical attributes of a row or series, e.g. `{"城市": "南宁"}`.
///
/// Entries keep the column order they were read in, which is what ends up in display
/// names. Equality and [`Self::grouping_key`] ignore that order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct DimensionSet(IndexMap<String, String>);

impl DimensionSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the value of a dimension, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.values().map(String::as_str)
    }

    /// The sorted `key:value` join of all entries, or [`DEFAULT_DIMENSION_KEY`] if empty.
    pub fn grouping_key(&self) -> String {
        if self.is_empty() {
            return DEFAULT_DIMENSION_KEY.to_owned();
        }

        self.0
            .iter()
            .sorted()
            .map(|(k, v)| format!("{k}:{v}"))
            .join("|")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DimensionSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a DimensionSet {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
