//! Combining date and time components into one instant.

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

/// Civil date-and-time layouts, in `strtime` syntax, tried in order.
///
/// Inputs are normalized first: `-`, `年` and `月` become `/`, and runs of
/// whitespace become a single space.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%dT%H:%M:%S%.f",
    "%Y/%m/%dT%H:%M",
    "%Y/%m/%d %I:%M:%S %p",
    "%Y/%m/%d %I:%M %p",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%Y%m%d %H:%M:%S%.f",
    "%Y%m%d %H:%M",
];

/// Civil date layouts without a time of day, read as midnight.
pub const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%m/%d/%Y", "%Y%m%d"];

/// Combines the date and time components of a record into one instant.
///
/// * both present: `"<date> <time>"`
/// * one present: that one alone
/// * none present: `None`
///
/// Returns `None` if the result does not parse, see [`parse_timestamp`].
pub fn resolve_timestamp(
    date: Option<&str>,
    time: Option<&str>,
    tz: &TimeZone,
) -> Option<Timestamp> {
    let date = date.map(str::trim).filter(|s| !s.is_empty());
    let time = time.map(str::trim).filter(|s| !s.is_empty());

    let combined = match (date, time) {
        (Some(date), Some(time)) => format!("{date} {time}"),
        (Some(only), None) | (None, Some(only)) => only.to_owned(),
        (None, None) => return None,
    };

    let timestamp = parse_timestamp(&combined, tz);
    if timestamp.is_none() {
        dc_log::trace!("Unparsable timestamp {combined:?}");
    }
    timestamp
}

/// Parses a timestamp the way people write them in spreadsheets.
///
/// * With a `Z` or a numeric offset (RFC 3339): that exact instant.
/// * 13 digits: milliseconds since the unix epoch; 10 digits: seconds.
/// * Otherwise one of [`DATE_TIME_FORMATS`] or [`DATE_FORMATS`], read in `tz`.
pub fn parse_timestamp(input: &str, tz: &TimeZone) -> Option<Timestamp> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Some(timestamp);
    }

    if input.bytes().all(|b| b.is_ascii_digit())
        && let Some(timestamp) = parse_epoch(input)
    {
        return Some(timestamp);
    }

    parse_civil(&normalize(input))?
        .to_zoned(tz.clone())
        .ok()
        .map(|zoned| zoned.timestamp())
}

fn parse_epoch(digits: &str) -> Option<Timestamp> {
    let n: i64 = digits.parse().ok()?;
    match digits.len() {
        13 => Timestamp::from_millisecond(n).ok(),
        10 => Timestamp::from_second(n).ok(),
        _ => None,
    }
}

/// `2026-01-28` → `2026/01/28`, `2026年1月28日 8:05` → `2026/1/28 8:05`.
fn normalize(s: &str) -> String {
    s.replace(['-', '年', '月'], "/")
        .replace('日', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_civil(s: &str) -> Option<DateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| DateTime::strptime(format, s).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| Date::strptime(format, s).ok())
                .map(|date| date.to_datetime(Time::midnight()))
        })
        // Two-digit years have no century to guess.
        .filter(|datetime| datetime.year() >= 1000)
}
