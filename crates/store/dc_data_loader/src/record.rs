use indexmap::IndexMap;

/// One row as read from a file: field name to raw value, in column order.
pub type RawRecord = IndexMap<String, RawValue>;

/// A cell before any interpretation.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// Missing or explicitly `null`.
    Null,

    Text(String),

    Number(f64),
}

impl RawValue {
    /// Converts one JSON field. Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Text(b.to_string()),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(value.to_string())
            }
        }
    }

    /// The value as trimmed text; `None` for [`Self::Null`] and blank strings.
    ///
    /// Integral numbers are printed without a fractional part, so that e.g. epoch
    /// milliseconds read from JSON look the same as when read from CSV.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_owned())
            }
            Self::Number(n) => {
                // `as i64` would drop the sign of `-0.0`.
                let negative_zero = *n == 0.0 && n.is_sign_negative();
                if n.fract() == 0.0 && n.abs() < 1e15 && !negative_zero {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
        }
    }
}

impl From<&str> for RawValue {
    #[inline]
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for RawValue {
    #[inline]
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for RawValue {
    #[inline]
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<T: Into<Self>> From<Option<T>> for RawValue {
    #[inline]
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Builds a [`RawRecord`] from `(name, value)` pairs.
pub fn raw_record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> RawRecord
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
