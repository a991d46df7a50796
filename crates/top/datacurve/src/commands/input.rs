use std::io::Read as _;
use std::path::Path;

use anyhow::Context as _;
use dc_data_loader::{ImportOptions, ImportReport};
use dc_log::ResultExt as _;
use dc_series::{SeriesFilter, SeriesStore, TimeZoneSetting};

// ---

/// Where the series come from.
#[derive(Debug, Clone, clap::Args)]
pub struct InputArgs {
    /// Files to import (`.csv` or `.json`).
    ///
    /// Reads pasted text (CSV, or JSON if it starts with `[`) from standard input if no paths
    /// are specified, or for `-`.
    pub paths: Vec<String>,

    /// Zone for times written without an offset: `local`, `utc`, or an IANA name such as
    /// `Asia/Shanghai`.
    #[clap(long, env = "DATACURVE_TIME_ZONE", default_value = "local")]
    pub time_zone: TimeZoneSetting,

    /// If set, files that fail to load are logged and skipped instead of aborting.
    #[clap(long, default_missing_value = "true", num_args = 0..=1)]
    pub continue_on_error: Option<bool>,
}

impl InputArgs {
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions::with_time_zone(self.time_zone.clone())
    }

    /// One report per input, in argument order.
    pub fn load(&self) -> anyhow::Result<Vec<ImportReport>> {
        let options = self.import_options();
        let continue_on_error = self.continue_on_error.unwrap_or(false);

        let stdin = ["-".to_owned()];
        let paths = if self.paths.is_empty() {
            &stdin[..]
        } else {
            &self.paths[..]
        };

        let mut reports = Vec::with_capacity(paths.len());
        for path in paths {
            let report = load_one(path, &options);
            let report = if continue_on_error {
                report.ok_or_log_error()
            } else {
                Some(report?)
            };
            reports.extend(report);
        }

        Ok(reports)
    }

    /// All inputs, merged into one store in argument order.
    pub fn load_store(&self) -> anyhow::Result<SeriesStore> {
        Ok(self
            .load()?
            .into_iter()
            .fold(SeriesStore::new(), |store, report| {
                store.with_imported(report.series)
            }))
    }
}

fn load_one(path: &str, options: &ImportOptions) -> anyhow::Result<ImportReport> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return dc_data_loader::load_pasted_text(&text, options)
            .context("Failed to import standard input");
    }

    dc_data_loader::load_from_path(Path::new(path), options)
        .with_context(|| format!("Failed to import {path:?}"))
}

// ---

/// Which of the imported series to use.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FilterArgs {
    /// Only series on this date (`YYYY-MM-DD`). Can be repeated.
    ///
    /// Defaults to the date of the first imported series.
    #[clap(long = "date")]
    pub dates: Vec<jiff::civil::Date>,

    /// Use every date instead of the default one.
    #[clap(long, conflicts_with = "dates")]
    pub all_dates: bool,

    /// Only series with this dimension value, as `key=value`. Can be repeated.
    #[clap(long = "dim")]
    pub dimensions: Vec<String>,

    /// Only series of this metric. Can be repeated.
    #[clap(long = "metric")]
    pub metrics: Vec<String>,
}

impl FilterArgs {
    pub fn to_filter(&self, store: &SeriesStore) -> anyhow::Result<SeriesFilter> {
        let mut filter = SeriesFilter::default();

        if !self.all_dates {
            if self.dates.is_empty() {
                filter.dates.extend(store.default_date());
            } else {
                filter.dates.extend(self.dates.iter().copied());
            }
        }

        for dimension in &self.dimensions {
            let (key, value) = dimension
                .split_once('=')
                .with_context(|| format!("Expected key=value, got {dimension:?}"))?;
            filter = filter.with_dimension(key.trim(), value.trim());
        }

        for metric in &self.metrics {
            filter = filter.with_metric(metric.clone());
        }

        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SeriesStore {
        let report = dc_data_loader::load_pasted_text(
            "time,城市,value\n2026-01-29 08:00,南宁,1\n2026-01-28 08:00,柳州,2\n",
            &ImportOptions::with_time_zone(TimeZoneSetting::Utc),
        )
        .unwrap();
        SeriesStore::new().with_imported(report.series)
    }

    #[test]
    fn test_default_date_is_first_series() {
        let filter = FilterArgs::default().to_filter(&store()).unwrap();
        assert_eq!(
            filter.dates.into_iter().collect::<Vec<_>>(),
            [jiff::civil::date(2026, 1, 29)]
        );
    }

    #[test]
    fn test_all_dates() {
        let args = FilterArgs {
            all_dates: true,
            ..Default::default()
        };
        assert!(args.to_filter(&store()).unwrap().dates.is_empty());
    }

    #[test]
    fn test_dimension_filter() {
        let args = FilterArgs {
            dimensions: vec!["城市 = 南宁".to_owned()],
            ..Default::default()
        };
        let filter = args.to_filter(&store()).unwrap();
        assert!(filter.dimensions["城市"].contains("南宁"));

        let args = FilterArgs {
            dimensions: vec!["城市".to_owned()],
            ..Default::default()
        };
        assert!(args.to_filter(&store()).is_err());
    }

    #[test]
    fn test_skip_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        std::fs::write(&good, "time,value\n2026-01-29 08:00,1\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let mut args = InputArgs {
            paths: vec![
                missing.to_string_lossy().into_owned(),
                good.to_string_lossy().into_owned(),
            ],
            time_zone: TimeZoneSetting::Utc,
            continue_on_error: None,
        };
        assert!(args.load().is_err());

        args.continue_on_error = Some(true);
        let reports = args.load().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].series.len(), 1);
    }
}
