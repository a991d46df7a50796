use jiff::Timestamp;
use jiff::civil::Date;

use crate::DimensionSet;

/// The label used in series names for data that did not come from a file.
pub const PASTED_SOURCE_LABEL: &str = "manual import";

/// One observation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct DataPoint {
    pub time: Timestamp,

    /// Always finite.
    pub value: f64,
}

impl DataPoint {
    #[inline]
    pub fn new(time: Timestamp, value: f64) -> Self {
        Self { time, value }
    }
}

// ----------------------------------------------------------------------------

/// Identifies a [`Series`] across imports, exports and re-imports.
///
/// Randomly generated, never derived from content: importing the same file twice
/// yields distinct ids.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct SeriesId(uuid::Uuid);

impl SeriesId {
    #[inline]
    #[expect(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for SeriesId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

// ----------------------------------------------------------------------------

/// Where an import came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
pub enum SourceLabel {
    /// A file, by name (a full path is fine, only the file name is used).
    File(String),

    /// Text pasted or piped in by the user.
    Pasted,
}

impl SourceLabel {
    pub fn from_path(path: &std::path::Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::File(name)
    }

    /// The label as it appears in series names: file name without its extension,
    /// or [`PASTED_SOURCE_LABEL`].
    pub fn display_label(&self) -> String {
        match self {
            Self::File(name) => {
                let file_name = std::path::Path::new(name)
                    .file_name()
                    .map_or_else(|| name.clone(), |n| n.to_string_lossy().into_owned());
                match file_name.rsplit_once('.') {
                    Some((stem, _extension)) if !stem.is_empty() => stem.to_owned(),
                    _ => file_name,
                }
            }
            Self::Pasted => PASTED_SOURCE_LABEL.to_owned(),
        }
    }
}

impl std::fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_label())
    }
}

// ----------------------------------------------------------------------------

/// A named run of points for one metric, on one calendar day, for one combination of
/// dimension values.
///
/// Series are immutable values once built: editing one means replacing it.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Series {
    pub id: SeriesId,

    /// Display label: `metric[ (dimension values…)] (source)`.
    pub name: String,

    /// The column the values were read from.
    pub metric_name: String,

    /// Display unit, possibly empty.
    pub unit: String,

    /// The calendar day all points fall on.
    pub date: Date,

    pub dimensions: DimensionSet,

    /// In import order, not necessarily sorted by time.
    pub data: Vec<DataPoint>,
}

impl Series {
    /// The display name for a series of `metric_name` with the given dimensions, from `source`.
    pub fn compose_name(
        metric_name: &str,
        dimensions: &DimensionSet,
        source: &SourceLabel,
    ) -> String {
        let source = source.display_label();
        if dimensions.is_empty() {
            format!("{metric_name} ({source})")
        } else {
            let values = dimensions.values().collect::<Vec<_>>().join(", ");
            format!("{metric_name} ({values}) ({source})")
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
