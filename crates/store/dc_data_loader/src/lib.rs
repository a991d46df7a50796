//! Turns tables with arbitrary headers into named, unit-tagged time series.
//!
//! Importing goes through four stages, each in its own module:
//!
//! 1. [`classify_record`] decides per field whether it is a time component, a metric,
//!    a dimension, or nothing.
//! 2. [`resolve_timestamp`] turns the time components into one instant.
//! 3. [`infer_unit`] derives a display unit from a metric name.
//! 4. [`partition_rows`] groups the rows of one import into [`Series`].
//!
//! [`import_records`] runs all of them. The [`DataLoader`]s read CSV and JSON files into
//! [`RawRecord`]s first, and [`export_table`] flattens series back into a table.

mod classify;
mod export;
mod loader_csv;
mod loader_json;
mod partition;
mod record;
mod temporal;
mod unit;

use std::path::{Path, PathBuf};

use dc_series::{Series, SourceLabel, TimeZoneSetting};

pub use self::classify::{
    ClassifiedRecord, DATE_FIELD_PRIORITY, EXCLUDED_FIELDS, FUZZY_TIME_FRAGMENTS, FieldClass,
    NA_TOKENS, TIME_FIELD_PRIORITY, classify_record, classify_value, is_excluded_field,
    is_fuzzy_time_field, is_na_token, parse_metric_value,
};
pub use self::export::{EXPORT_DATE_COLUMN, EXPORT_TIME_COLUMN, ExportTable, export_table};
pub use self::loader_csv::CsvLoader;
pub use self::loader_json::JsonLoader;
pub use self::partition::{ResolvedRow, partition_rows};
pub use self::record::{RawRecord, RawValue, raw_record};
pub use self::temporal::{DATE_FORMATS, DATE_TIME_FORMATS, parse_timestamp, resolve_timestamp};
pub use self::unit::{UNIT_KEYWORDS, base_metric_name, infer_unit, parenthetical};

// ----------------------------------------------------------------------------

/// Options shared by every import.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Zone in which times without an explicit offset are read, and calendar dates are taken.
    pub time_zone: TimeZoneSetting,
}

impl ImportOptions {
    #[inline]
    pub fn with_time_zone(time_zone: TimeZoneSetting) -> Self {
        Self { time_zone }
    }
}

/// The outcome of one import.
#[derive(Clone, Debug)]
pub struct ImportReport {
    pub source: SourceLabel,

    /// In partition order; see [`partition_rows`].
    pub series: Vec<Series>,

    /// Number of rows read.
    pub rows_total: usize,

    /// Rows that had no metric or no valid time.
    pub rows_dropped: usize,
}

impl ImportReport {
    /// `true` if nothing usable was found.
    ///
    /// That is not an error: callers decide how to tell the user.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Classifies, resolves and partitions the rows of one import.
pub fn import_records(
    records: &[RawRecord],
    source: &SourceLabel,
    options: &ImportOptions,
) -> ImportReport {
    let tz = options.time_zone.to_jiff_time_zone();

    let rows: Vec<ResolvedRow> = records
        .iter()
        .map(classify_record)
        .filter_map(|record| ResolvedRow::resolve(record, &tz))
        .collect();

    let series = partition_rows(&rows, source, &tz);

    let report = ImportReport {
        source: source.clone(),
        series,
        rows_total: records.len(),
        rows_dropped: records.len() - rows.len(),
    };

    if report.is_empty() {
        dc_log::warn!(
            "No valid series produced from {source} ({} rows read)",
            report.rows_total
        );
    } else {
        dc_log::debug!(
            "Imported {} series from {source}, dropped {}/{} rows",
            report.series.len(),
            report.rows_dropped,
            report.rows_total
        );
    }

    report
}

// ----------------------------------------------------------------------------

/// Errors that can occur when reading a table.
///
/// Bad rows and bad cells are never errors; see [`ImportReport::rows_dropped`].
#[derive(thiserror::Error, Debug)]
pub enum DataLoaderError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data-loader support for {0:?}")]
    Incompatible(PathBuf),
}

impl DataLoaderError {
    #[inline]
    pub fn is_path_not_found(&self) -> bool {
        match self {
            Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }

    #[inline]
    pub fn is_incompatible(&self) -> bool {
        matches!(self, Self::Incompatible(_))
    }
}

/// Reads one tabular file format into [`RawRecord`]s.
///
/// A loader only parses; classification is the same for every format.
pub trait DataLoader: Send + Sync {
    /// Name of the loader, for logging.
    fn name(&self) -> &'static str;

    /// `extension` is lowercase and without the leading dot.
    fn supports_extension(&self, extension: &str) -> bool;

    fn load_records(&self, contents: &[u8]) -> Result<Vec<RawRecord>, DataLoaderError>;
}

static BUILTIN_LOADERS: [&dyn DataLoader; 2] = [&CsvLoader, &JsonLoader];

/// Iterator over all registered [`DataLoader`]s.
#[inline]
pub fn iter_loaders() -> impl Iterator<Item = &'static dyn DataLoader> {
    BUILTIN_LOADERS.iter().copied()
}

/// File extensions, lowercase, that some loader can read.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "json"];

#[inline]
pub fn is_supported_file_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// Lowercase extension of `path`, without the dot; empty if there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .unwrap_or_default()
        .to_ascii_lowercase()
        .to_string_lossy()
        .to_string()
}

/// Imports a file, picking the loader from the file extension.
pub fn load_from_path(
    filepath: &Path,
    options: &ImportOptions,
) -> Result<ImportReport, DataLoaderError> {
    if filepath.is_dir() {
        return Err(DataLoaderError::Incompatible(filepath.to_path_buf()));
    }

    let contents = std::fs::read(filepath)?;
    load_from_file_contents(filepath, &contents, options)
}

/// Like [`load_from_path`], with the contents already in memory.
///
/// `filepath` picks the loader and names the series.
pub fn load_from_file_contents(
    filepath: &Path,
    contents: &[u8],
    options: &ImportOptions,
) -> Result<ImportReport, DataLoaderError> {
    let extension = extension(filepath);
    let Some(loader) = iter_loaders().find(|loader| loader.supports_extension(&extension))
    else {
        return Err(DataLoaderError::Incompatible(filepath.to_path_buf()));
    };

    dc_log::debug!("Loading {filepath:?} with {}", loader.name());

    let records = loader.load_records(contents)?;
    Ok(import_records(
        &records,
        &SourceLabel::from_path(filepath),
        options,
    ))
}

/// Imports text typed or pasted by the user.
///
/// Text starting with `[` or `{` is read as JSON, anything else as CSV.
pub fn load_pasted_text(
    text: &str,
    options: &ImportOptions,
) -> Result<ImportReport, DataLoaderError> {
    let trimmed = text.trim_start();
    let records = if trimmed.starts_with('[') || trimmed.starts_with('{') {
        JsonLoader.load_records(trimmed.as_bytes())?
    } else {
        CsvLoader.load_records(trimmed.as_bytes())?
    };

    Ok(import_records(&records, &SourceLabel::Pasted, options))
}
