use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::TimeZone;

/// Which time zone civil dates and times are read and bucketed in.
///
/// Imported timestamps rarely carry an offset, so a zone has to be assumed.
/// The default is the zone of the process doing the import.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeZoneSetting {
    /// The system zone of the current process.
    #[default]
    Local,

    Utc,

    /// An IANA time zone name, e.g. `Asia/Shanghai`.
    Named(String),
}

impl TimeZoneSetting {
    pub fn to_jiff_time_zone(&self) -> TimeZone {
        match self {
            Self::Utc => TimeZone::UTC,

            Self::Local => TimeZone::try_system().unwrap_or_else(|err| {
                dc_log::warn_once!("Failed to detect system/local time zone: {err}");
                TimeZone::UTC
            }),

            Self::Named(name) => TimeZone::get(name).unwrap_or_else(|err| {
                dc_log::warn_once!("Unknown time zone {name:?}, using UTC: {err}");
                TimeZone::UTC
            }),
        }
    }
}

impl std::str::FromStr for TimeZoneSetting {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(if s.eq_ignore_ascii_case("local") || s.is_empty() {
            Self::Local
        } else if s.eq_ignore_ascii_case("utc") || s == "Z" {
            Self::Utc
        } else {
            Self::Named(s.to_owned())
        })
    }
}

impl std::fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Utc => f.write_str("utc"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The calendar date `time` falls on, in the given zone.
#[inline]
pub fn calendar_date(time: Timestamp, tz: &TimeZone) -> Date {
    tz.to_datetime(time).date()
}
