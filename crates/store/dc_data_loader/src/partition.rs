use indexmap::{IndexMap, IndexSet};
use jiff::Timestamp;
use jiff::tz::TimeZone;

use dc_series::{DataPoint, DimensionSet, Series, SeriesId, SourceLabel, calendar_date};

use crate::{ClassifiedRecord, infer_unit, resolve_timestamp};

/// A classified record whose timestamp resolved and that has at least one metric.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRow {
    pub time: Timestamp,
    pub dimensions: DimensionSet,
    pub values: IndexMap<String, f64>,
}

impl ResolvedRow {
    /// `None` for rows that cannot contribute to any series: no metrics, or no valid time.
    pub fn resolve(record: ClassifiedRecord, tz: &TimeZone) -> Option<Self> {
        if record.values.is_empty() {
            dc_log::trace!("Dropping row without metrics: {record:?}");
            return None;
        }

        let time = resolve_timestamp(record.date.as_deref(), record.time.as_deref(), tz)?;

        Some(Self {
            time,
            dimensions: record.dimensions,
            values: record.values,
        })
    }
}

/// Rows sharing a calendar date and a dimension combination.
struct Group<'a> {
    dimensions: &'a DimensionSet,
    rows: Vec<&'a ResolvedRow>,
}

/// Splits the rows of one import into series.
///
/// Two rows end up in the same series if and only if they share the calendar date
/// (in `tz`), the dimension combination and the metric. Groups come out in order of
/// first appearance, metrics within a group in order of first appearance, and points
/// keep row order.
///
/// Every series gets a fresh [`SeriesId`].
pub fn partition_rows(
    rows: &[ResolvedRow],
    source: &SourceLabel,
    tz: &TimeZone,
) -> Vec<Series> {
    let mut groups: IndexMap<(jiff::civil::Date, String), Group<'_>> = IndexMap::new();

    for row in rows {
        let key = (calendar_date(row.time, tz), row.dimensions.grouping_key());
        groups
            .entry(key)
            .or_insert_with(|| Group {
                dimensions: &row.dimensions,
                rows: Vec::new(),
            })
            .rows
            .push(row);
    }

    let mut all_series = Vec::new();

    for ((date, _), group) in &groups {
        let metrics: IndexSet<&str> = group
            .rows
            .iter()
            .flat_map(|row| row.values.keys().map(String::as_str))
            .collect();

        for metric in metrics {
            let data: Vec<DataPoint> = group
                .rows
                .iter()
                .filter_map(|row| {
                    let value = row.values.get(metric)?;
                    Some(DataPoint::new(row.time, *value))
                })
                .collect();

            all_series.push(Series {
                id: SeriesId::new(),
                name: Series::compose_name(metric, group.dimensions, source),
                metric_name: metric.to_owned(),
                unit: infer_unit(metric),
                date: *date,
                dimensions: group.dimensions.clone(),
                data,
            });
        }
    }

    dc_log::debug!(
        "Partitioned {} rows from {source} into {} series over {} groups",
        rows.len(),
        all_series.len(),
        groups.len(),
    );

    all_series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time: &str, dims: &[(&str, &str)], values: &[(&str, f64)]) -> ResolvedRow {
        ResolvedRow {
            time: time.parse().unwrap(),
            dimensions: dims.iter().copied().collect(),
            values: values.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        }
    }

    #[test]
    fn test_groups_by_date_dimensions_and_metric() {
        let rows = [
            row("2026-01-29T08:00:00Z", &[("城市", "南宁")], &[("温度", 1.0), ("湿度", 80.0)]),
            row("2026-01-29T08:00:00Z", &[("城市", "柳州")], &[("温度", 2.0)]),
            row("2026-01-29T09:00:00Z", &[("城市", "南宁")], &[("温度", 3.0)]),
            row("2026-01-30T08:00:00Z", &[("城市", "南宁")], &[("湿度", 70.0)]),
        ];
        let series = partition_rows(&rows, &SourceLabel::Pasted, &TimeZone::UTC);

        let summary: Vec<(String, String, usize)> = series
            .iter()
            .map(|s| (s.date.to_string(), s.name.clone(), s.data.len()))
            .collect();

        similar_asserts::assert_eq!(
            summary,
            vec![
                ("2026-01-29".to_owned(), "温度 (南宁) (manual import)".to_owned(), 2),
                ("2026-01-29".to_owned(), "湿度 (南宁) (manual import)".to_owned(), 1),
                ("2026-01-29".to_owned(), "温度 (柳州) (manual import)".to_owned(), 1),
                ("2026-01-30".to_owned(), "湿度 (南宁) (manual import)".to_owned(), 1),
            ]
        );

        let values: Vec<f64> = series[0].data.iter().map(|p| p.value).collect();
        assert_eq!(values, [1.0, 3.0]);
    }

    #[test]
    fn test_points_keep_row_order() {
        let rows = [
            row("2026-01-29T09:00:00Z", &[], &[("v", 2.0)]),
            row("2026-01-29T08:00:00Z", &[], &[("v", 1.0)]),
        ];
        let series = partition_rows(&rows, &SourceLabel::Pasted, &TimeZone::UTC);
        assert_eq!(series.len(), 1);
        let values: Vec<f64> = series[0].data.iter().map(|p| p.value).collect();
        assert_eq!(values, [2.0, 1.0]);
    }

    #[test]
    fn test_date_follows_time_zone() {
        let rows = [row("2026-01-28T20:00:00Z", &[], &[("v", 1.0)])];

        let series = partition_rows(&rows, &SourceLabel::Pasted, &TimeZone::UTC);
        assert_eq!(series[0].date, jiff::civil::date(2026, 1, 28));

        let plus_eight = TimeZone::fixed(jiff::tz::offset(8));
        let series = partition_rows(&rows, &SourceLabel::Pasted, &plus_eight);
        assert_eq!(series[0].date, jiff::civil::date(2026, 1, 29));
    }

    #[test]
    fn test_ids_are_unique() {
        let rows = [
            row("2026-01-29T08:00:00Z", &[], &[("a", 1.0), ("b", 2.0)]),
            row("2026-01-30T08:00:00Z", &[], &[("a", 1.0), ("b", 2.0)]),
        ];
        let series = partition_rows(&rows, &SourceLabel::Pasted, &TimeZone::UTC);
        let ids: std::collections::HashSet<_> = series.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_empty() {
        assert!(partition_rows(&[], &SourceLabel::Pasted, &TimeZone::UTC).is_empty());
    }
}
