//! Flattening series back into a table.
//!
//! The table has one `日期` column, one `时间` column, one column per dimension key and
//! one column per metric. Points from different series that share date, time and
//! dimensions land on the same row. Importing the written table again reproduces the
//! same `(date, dimensions, metric, value)` multiset.

use indexmap::{IndexMap, IndexSet};
use jiff::tz::TimeZone;

use dc_series::Series;

use crate::{DataLoaderError, RawRecord, RawValue};

/// Name of the exported date column.
pub const EXPORT_DATE_COLUMN: &str = "日期";

/// Name of the exported time-of-day column.
pub const EXPORT_TIME_COLUMN: &str = "时间";

/// A rectangular table: every row has a cell for every column, [`RawValue::Null`] when
/// the row has no value there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRecord>,
}

impl ExportTable {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write_csv(&self, writer: impl std::io::Write) -> Result<(), DataLoaderError> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(self.columns.iter().map(|column| {
                row.get(column)
                    .and_then(RawValue::to_text)
                    .unwrap_or_default()
            }))?;
        }
        writer.flush()?;
        Ok(())
    }

    /// An array of row objects. Empty cells are left out.
    pub fn to_json(&self) -> serde_json::Value {
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|(column, value)| {
                        let value = match value {
                            RawValue::Null => return None,
                            RawValue::Text(text) => serde_json::Value::from(text.clone()),
                            RawValue::Number(number) => serde_json::Value::from(*number),
                        };
                        Some((column.clone(), value))
                    })
                    .collect::<serde_json::Map<_, _>>()
                    .into()
            })
            .collect::<Vec<serde_json::Value>>()
            .into()
    }

    pub fn write_json(&self, writer: impl std::io::Write) -> Result<(), DataLoaderError> {
        serde_json::to_writer_pretty(writer, &self.to_json())?;
        Ok(())
    }
}

/// Flattens `series` into one table, rendering times of day in `tz`.
///
/// Rows come out in order of first appearance. If several points of one metric share a
/// row key (date, time and dimensions), the second one goes on a second row with the same
/// key, and so on.
pub fn export_table<'a>(
    series: impl IntoIterator<Item = &'a Series>,
    tz: &TimeZone,
) -> ExportTable {
    let mut dimension_columns: IndexSet<String> = IndexSet::new();
    let mut metric_columns: IndexSet<String> = IndexSet::new();

    // Row key -> rows sharing that key.
    let mut rows: IndexMap<(String, String, String), Vec<RawRecord>> = IndexMap::new();

    for series in series {
        metric_columns.insert(series.metric_name.clone());
        dimension_columns.extend(series.dimensions.keys().map(str::to_owned));

        let date = series.date.to_string();
        let dimension_key = series.dimensions.grouping_key();

        for point in &series.data {
            let time = tz.to_datetime(point.time).time().to_string();

            let bucket = rows
                .entry((date.clone(), time.clone(), dimension_key.clone()))
                .or_default();

            let free_row = bucket
                .iter()
                .position(|row| !row.contains_key(&series.metric_name));
            let row = if let Some(index) = free_row {
                &mut bucket[index]
            } else {
                let mut row = RawRecord::new();
                row.insert(EXPORT_DATE_COLUMN.to_owned(), RawValue::Text(date.clone()));
                row.insert(EXPORT_TIME_COLUMN.to_owned(), RawValue::Text(time.clone()));
                for (key, value) in &series.dimensions {
                    row.insert(key.clone(), RawValue::Text(value.clone()));
                }
                bucket.push(row);
                let last = bucket.len() - 1;
                &mut bucket[last]
            };

            row.insert(series.metric_name.clone(), RawValue::Number(point.value));
        }
    }

    let columns: Vec<String> = [EXPORT_DATE_COLUMN.to_owned(), EXPORT_TIME_COLUMN.to_owned()]
        .into_iter()
        .chain(dimension_columns)
        .chain(metric_columns)
        .collect();

    let rows = rows
        .into_values()
        .flatten()
        .map(|row| {
            columns
                .iter()
                .map(|column| {
                    let value = row.get(column).cloned().unwrap_or(RawValue::Null);
                    (column.clone(), value)
                })
                .collect()
        })
        .collect();

    ExportTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use dc_series::{DataPoint, DimensionSet, SeriesId};
    use jiff::Timestamp;

    use super::*;

    fn series(metric: &str, city: Option<&str>, points: &[(&str, f64)]) -> Series {
        let dimensions: DimensionSet = city.into_iter().map(|city| ("城市", city)).collect();
        Series {
            id: SeriesId::new(),
            name: metric.to_owned(),
            metric_name: metric.to_owned(),
            unit: String::new(),
            date: "2026-01-28".parse().unwrap(),
            dimensions,
            data: points
                .iter()
                .map(|(time, value)| DataPoint::new(time.parse::<Timestamp>().unwrap(), *value))
                .collect(),
        }
    }

    #[test]
    fn test_metrics_share_rows() {
        let temperature = series(
            "温度(°C)",
            Some("南宁"),
            &[("2026-01-28T00:00:00Z", 12.4), ("2026-01-28T01:00:00Z", 11.9)],
        );
        let humidity = series("湿度", Some("南宁"), &[("2026-01-28T00:00:00Z", 80.0)]);

        let table = export_table([&temperature, &humidity], &TimeZone::UTC);

        assert_eq!(table.columns, ["日期", "时间", "城市", "温度(°C)", "湿度"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["时间"], RawValue::from("00:00:00"));
        assert_eq!(table.rows[0]["湿度"], RawValue::Number(80.0));
        assert_eq!(table.rows[1]["温度(°C)"], RawValue::Number(11.9));
        assert_eq!(table.rows[1]["湿度"], RawValue::Null);
    }

    #[test]
    fn test_duplicate_keys_get_their_own_rows() {
        let value = series(
            "value",
            None,
            &[("2026-01-28T08:00:00Z", 1.0), ("2026-01-28T08:00:00Z", 2.0)],
        );

        let table = export_table([&value], &TimeZone::UTC);

        assert_eq!(table.columns, ["日期", "时间", "value"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["value"], RawValue::Number(1.0));
        assert_eq!(table.rows[1]["value"], RawValue::Number(2.0));
    }

    #[test]
    fn test_write_csv() {
        let value = series("value", Some("南宁"), &[("2026-01-28T08:30:00.5Z", 2.5)]);
        let other = series("value", None, &[("2026-01-28T09:00:00Z", 3.0)]);

        let mut out = Vec::new();
        export_table([&value, &other], &TimeZone::UTC)
            .write_csv(&mut out)
            .unwrap();

        similar_asserts::assert_eq!(
            String::from_utf8(out).unwrap(),
            "日期,时间,城市,value\n2026-01-28,08:30:00.5,南宁,2.5\n2026-01-28,09:00:00,,3\n"
        );
    }

    #[test]
    fn test_json_skips_empty_cells() {
        let value = series("value", None, &[("2026-01-28T09:00:00Z", 3.0)]);
        let other = series("other", None, &[("2026-01-28T10:00:00Z", 4.0)]);

        let json = export_table([&value, &other], &TimeZone::UTC).to_json();

        assert_eq!(
            json,
            serde_json::json!([
                {"日期": "2026-01-28", "时间": "09:00:00", "value": 3.0},
                {"日期": "2026-01-28", "时间": "10:00:00", "other": 4.0},
            ])
        );
    }
}
