//! Deciding, field by field, what a raw record means.
//!
//! Classification is local to the record and driven by values: there is no schema.
//! The order of the rules below is fixed:
//!
//! 1. The first non-blank field named in [`DATE_FIELD_PRIORITY`] is the date component.
//! 2. The first non-blank field named in [`TIME_FIELD_PRIORITY`] is the time component.
//! 3. Only if neither matched: the first non-blank field whose name contains one of
//!    [`FUZZY_TIME_FRAGMENTS`] (ASCII case-insensitive) is the whole timestamp.
//! 4. Every other field, except [`is_excluded_field`] ones, is a metric if its value is a
//!    finite number, a dimension if it is other non-blank text, and dropped otherwise.
//!    [`NA_TOKENS`] are never metrics nor dimensions.
//!
//! An explicit date/time field therefore always wins over numeric-looking content.

use indexmap::IndexMap;

use dc_series::DimensionSet;

use crate::{RawRecord, RawValue};

/// Field names holding the date, highest priority first.
pub const DATE_FIELD_PRIORITY: [&str; 4] = ["日期", "date", "Date", "day"];

/// Field names holding the time of day (or a full timestamp), highest priority first.
pub const TIME_FIELD_PRIORITY: [&str; 5] = ["时间", "time", "Time", "Timestamp", "timestamp"];

/// Name fragments that mark a field as time-bearing when no priority name matched.
pub const FUZZY_TIME_FRAGMENTS: [&str; 4] = ["time", "date", "时间", "日期"];

/// Values meaning "not available", compared ASCII case-insensitively after trimming.
pub const NA_TOKENS: [&str; 7] = ["-", "--", "nan", "null", "none", "n/a", "undefined"];

/// Field names (ASCII case-insensitive) that are neither metrics nor dimensions.
///
/// These are code columns, e.g. WMO weather codes: numeric, but averaging them is meaningless.
pub const EXCLUDED_FIELDS: [&str; 6] = [
    "code",
    "weathercode",
    "weather_code",
    "weather code",
    "天气代码",
    "天气编码",
];

/// What a single field of a record turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldClass {
    /// The date component of the timestamp.
    Date,

    /// The time component of the timestamp, or the whole of it.
    Time,

    /// Deliberately ignored, see [`EXCLUDED_FIELDS`].
    Excluded,

    /// A numeric observation.
    Metric(f64),

    /// A categorical attribute.
    Dimension(String),

    /// Blank or not-available.
    Dropped,
}

/// A record split into its time components, dimensions and metrics.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifiedRecord {
    /// Text of the date component, if any.
    pub date: Option<String>,

    /// Text of the time component, if any.
    pub time: Option<String>,

    pub dimensions: DimensionSet,

    /// Metric name to value, in column order.
    pub values: IndexMap<String, f64>,
}

impl ClassifiedRecord {
    #[inline]
    pub fn has_time(&self) -> bool {
        self.date.is_some() || self.time.is_some()
    }
}

/// Is this one of the [`NA_TOKENS`]?
pub fn is_na_token(text: &str) -> bool {
    let text = text.trim();
    NA_TOKENS.iter().any(|na| text.eq_ignore_ascii_case(na))
}

/// Is this one of the [`EXCLUDED_FIELDS`], with or without a unit parenthetical?
pub fn is_excluded_field(name: &str) -> bool {
    let name = crate::base_metric_name(name.trim());
    EXCLUDED_FIELDS.iter().any(|ex| name.eq_ignore_ascii_case(ex))
}

/// Does the field name look time-bearing? See [`FUZZY_TIME_FRAGMENTS`].
pub fn is_fuzzy_time_field(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    FUZZY_TIME_FRAGMENTS
        .iter()
        .any(|fragment| name.contains(fragment))
}

/// The value as a finite number, if it is one.
///
/// Numeric strings are accepted (`"12.4"`, `" -3 "`, `"1e3"`); anything else, including
/// not-available tokens, `inf` and `NaN`, is not.
pub fn parse_metric_value(value: &RawValue) -> Option<f64> {
    match value {
        RawValue::Null => None,
        RawValue::Number(n) => n.is_finite().then_some(*n),
        RawValue::Text(text) => {
            let text = text.trim();
            if text.is_empty() || is_na_token(text) {
                return None;
            }
            // `f64::from_str` also accepts "inf", "infinity" and "nan":
            text.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

/// Rule 4: what a field that is not time-bearing is.
pub fn classify_value(name: &str, value: &RawValue) -> FieldClass {
    if is_excluded_field(name) {
        return FieldClass::Excluded;
    }

    if let Some(number) = parse_metric_value(value) {
        return FieldClass::Metric(number);
    }

    match value.to_text() {
        Some(text) if !is_na_token(&text) => FieldClass::Dimension(text),
        _ => FieldClass::Dropped,
    }
}

/// First non-blank field among `names`, in the order of `names`.
fn first_present<'a>(record: &'a RawRecord, names: &[&str]) -> Option<(&'a str, String)> {
    names.iter().find_map(|name| {
        let (key, value) = record.get_key_value(*name)?;
        Some((key.as_str(), value.to_text()?))
    })
}

/// Classifies every field of the record. See the module docs for the rules.
pub fn classify_record(record: &RawRecord) -> ClassifiedRecord {
    let date = first_present(record, &DATE_FIELD_PRIORITY);
    let time = first_present(record, &TIME_FIELD_PRIORITY);

    let fuzzy = if date.is_none() && time.is_none() {
        record.iter().find_map(|(name, value)| {
            is_fuzzy_time_field(name)
                .then(|| value.to_text())
                .flatten()
                .map(|text| (name.as_str(), text))
        })
    } else {
        None
    };

    let fuzzy_name = fuzzy.as_ref().map(|(name, _)| *name);
    let is_time_bearing = |name: &str| {
        DATE_FIELD_PRIORITY.contains(&name)
            || TIME_FIELD_PRIORITY.contains(&name)
            || fuzzy_name == Some(name)
    };

    let mut classified = ClassifiedRecord {
        date: date.map(|(_, text)| text),
        time: time.or(fuzzy).map(|(_, text)| text),
        ..Default::default()
    };

    for (name, value) in record {
        if is_time_bearing(name) {
            continue;
        }

        match classify_value(name, value) {
            FieldClass::Metric(number) => {
                classified.values.insert(name.clone(), number);
            }
            FieldClass::Dimension(text) => {
                classified.dimensions.insert(name.clone(), text);
            }
            FieldClass::Excluded | FieldClass::Dropped => {
                dc_log::trace!("Ignoring field {name:?} = {value:?}");
            }
            FieldClass::Date | FieldClass::Time => {}
        }
    }

    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_record;

    #[test]
    fn test_priority_lists_are_pinned() {
        // Reordering these changes which column wins on real files.
        assert_eq!(DATE_FIELD_PRIORITY, ["日期", "date", "Date", "day"]);
        assert_eq!(
            TIME_FIELD_PRIORITY,
            ["时间", "time", "Time", "Timestamp", "timestamp"]
        );
    }

    #[test]
    fn test_split_date_and_time() {
        let record = raw_record([
            ("城市", "南宁"),
            ("日期", "2026-01-28"),
            ("时间", "00:00"),
            ("温度(°C)", "12.4"),
            ("相对湿度(%)", "82.0"),
        ]);
        let classified = classify_record(&record);

        assert_eq!(classified.date.as_deref(), Some("2026-01-28"));
        assert_eq!(classified.time.as_deref(), Some("00:00"));
        assert_eq!(classified.dimensions.get("城市"), Some("南宁"));
        assert_eq!(classified.dimensions.len(), 1);
        assert_eq!(
            classified.values.iter().collect::<Vec<_>>(),
            [
                (&"温度(°C)".to_owned(), &12.4),
                (&"相对湿度(%)".to_owned(), &82.0)
            ]
        );
    }

    #[test]
    fn test_first_present_wins() {
        let record = raw_record([("date", "2026-01-29"), ("日期", "2026-01-28"), ("v", "1")]);
        assert_eq!(classify_record(&record).date.as_deref(), Some("2026-01-28"));

        // A blank higher-priority field does not win:
        let record = raw_record([("日期", ""), ("Date", "2026-01-29"), ("v", "1")]);
        let classified = classify_record(&record);
        assert_eq!(classified.date.as_deref(), Some("2026-01-29"));
        // ... and is not a dimension either.
        assert!(classified.dimensions.is_empty());
    }

    #[test]
    fn test_time_field_wins_over_numeric_content() {
        let record = raw_record([("timestamp", "1769644800000"), ("value", "3")]);
        let classified = classify_record(&record);
        assert_eq!(classified.time.as_deref(), Some("1769644800000"));
        assert_eq!(classified.values.len(), 1);
        assert_eq!(classified.values["value"], 3.0);
    }

    #[test]
    fn test_fuzzy_fallback() {
        let record = raw_record([
            ("RandomLabel", "X"),
            ("UpdateTime", "2026-01-29 12:00"),
            ("SecretValue", "42.5"),
        ]);
        let classified = classify_record(&record);

        assert_eq!(classified.date, None);
        assert_eq!(classified.time.as_deref(), Some("2026-01-29 12:00"));
        assert_eq!(classified.values["SecretValue"], 42.5);
        assert_eq!(classified.dimensions.get("RandomLabel"), Some("X"));
        assert!(!classified.values.contains_key("UpdateTime"));
    }

    #[test]
    fn test_fuzzy_matches_cjk() {
        let record = raw_record([("采集时间", "2026-01-29 12:00"), ("v", "1")]);
        assert_eq!(
            classify_record(&record).time.as_deref(),
            Some("2026-01-29 12:00")
        );
    }

    #[test]
    fn test_no_fuzzy_when_priority_matched() {
        let record = raw_record([("time", "2026-01-29 12:00"), ("UpdateTime", "12")]);
        let classified = classify_record(&record);
        assert_eq!(classified.time.as_deref(), Some("2026-01-29 12:00"));
        assert_eq!(classified.values["UpdateTime"], 12.0);
    }

    #[test]
    fn test_na_tokens_are_never_metrics_or_dimensions() {
        for na in ["-", "--", "NaN", "nan", "NULL", "None", "N/A", "n/a", "undefined", " - "] {
            let record = raw_record([("time", "2026-01-29 12:00"), ("温度", na), ("城市", na)]);
            let classified = classify_record(&record);
            assert!(classified.values.is_empty(), "{na:?} became a metric");
            assert!(classified.dimensions.is_empty(), "{na:?} became a dimension");
        }
    }

    #[test]
    fn test_excluded_fields() {
        let record = raw_record([
            ("time", "2026-01-29 12:00"),
            ("weather_code", "3"),
            ("weather_code (wmo code)", "3"),
            ("Code", "A1"),
            ("温度", "4"),
        ]);
        let classified = classify_record(&record);
        assert_eq!(classified.values.keys().collect::<Vec<_>>(), ["温度"]);
        assert!(classified.dimensions.is_empty());
    }

    #[test]
    fn test_parse_metric_value() {
        assert_eq!(parse_metric_value(&RawValue::from("12.4")), Some(12.4));
        assert_eq!(parse_metric_value(&RawValue::from(" -3 ")), Some(-3.0));
        assert_eq!(parse_metric_value(&RawValue::from("1e3")), Some(1000.0));
        assert_eq!(parse_metric_value(&RawValue::Number(7.0)), Some(7.0));
        assert_eq!(parse_metric_value(&RawValue::Number(f64::NAN)), None);
        assert_eq!(parse_metric_value(&RawValue::from("inf")), None);
        assert_eq!(parse_metric_value(&RawValue::from("NaN")), None);
        assert_eq!(parse_metric_value(&RawValue::from("12abc")), None);
        assert_eq!(parse_metric_value(&RawValue::from("")), None);
        assert_eq!(parse_metric_value(&RawValue::Null), None);
    }

    #[test]
    fn test_malformed_number_becomes_dimension() {
        let record = raw_record([("time", "2026-01-29 12:00"), ("功率", "12abc")]);
        let classified = classify_record(&record);
        assert!(classified.values.is_empty());
        assert_eq!(classified.dimensions.get("功率"), Some("12abc"));
    }
}
