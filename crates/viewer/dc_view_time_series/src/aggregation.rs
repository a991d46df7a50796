use std::collections::BTreeMap;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime, Time};
use jiff::tz::TimeZone;

use crate::PlotPoint;

/// The temporal resolution points are drawn at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Points as imported. Used for single-day views.
    #[default]
    Hour,

    /// One point per calendar day, at midnight.
    Day,

    /// One point per calendar month, at midnight of the first.
    Month,
}

impl Granularity {
    pub const ALL: [Self; 3] = [Self::Hour, Self::Day, Self::Month];

    /// Start of the bucket `time` falls into, in `tz`.
    ///
    /// `None` only if that start is not representable.
    pub fn bucket_start(self, time: Timestamp, tz: &TimeZone) -> Option<Timestamp> {
        let date = match self {
            Self::Hour => return Some(time),
            Self::Day => tz.to_datetime(time).date(),
            Self::Month => tz.to_datetime(time).date().first_of_month(),
        };
        midnight(date, tz)
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
        })
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|granularity| granularity.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown granularity {s:?}, expected hour, day or month"))
    }
}

fn midnight(date: Date, tz: &TimeZone) -> Option<Timestamp> {
    date.to_zoned(tz.clone()).ok().map(|zoned| zoned.timestamp())
}

// ----------------------------------------------------------------------------

/// Collapses points to their [`Granularity`] by averaging.
pub struct AverageAggregator;

impl AverageAggregator {
    /// Output is sorted by time, whatever the input order.
    ///
    /// [`Granularity::Hour`] passes points through. Otherwise there is one point per
    /// bucket, at the bucket start, holding the mean of the bucket's values. The mean is
    /// weighted by [`PlotPoint::count`], so aggregating already aggregated points gives
    /// the same result as aggregating the originals.
    pub fn aggregate(
        granularity: Granularity,
        points: &[PlotPoint],
        tz: &TimeZone,
    ) -> Vec<PlotPoint> {
        if granularity == Granularity::Hour {
            let mut points = points.to_vec();
            points.sort_by_key(|p| p.time);
            return points;
        }

        // Bucket start -> (weighted sum, count)
        let mut buckets: BTreeMap<Timestamp, (f64, usize)> = BTreeMap::new();

        for point in points {
            let Some(start) = granularity.bucket_start(point.time, tz) else {
                dc_log::debug_once!("No {granularity} bucket for {}", point.time);
                continue;
            };
            let (sum, count) = buckets.entry(start).or_default();
            *sum += point.value * point.count as f64;
            *count += point.count;
        }

        buckets
            .into_iter()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(time, (sum, count))| PlotPoint {
                time,
                value: sum / count as f64,
                count,
            })
            .collect()
    }
}

// ----------------------------------------------------------------------------

/// The day all dates are shifted onto when overlapping.
pub const OVERLAP_REFERENCE_DATE: Date = jiff::civil::date(2000, 1, 1);

/// Moves `time` onto the reference timeline, keeping only the part that matters at
/// `granularity`:
///
/// * [`Granularity::Hour`]: the time of day, on [`OVERLAP_REFERENCE_DATE`]
/// * [`Granularity::Day`]: the day of month, in the reference month
/// * [`Granularity::Month`]: the month, in the reference year
pub fn overlap_time(
    granularity: Granularity,
    time: Timestamp,
    tz: &TimeZone,
) -> Option<Timestamp> {
    let civil = tz.to_datetime(time);
    let reference = OVERLAP_REFERENCE_DATE;

    let shifted = match granularity {
        Granularity::Hour => DateTime::from_parts(reference, civil.time()),
        Granularity::Day => DateTime::from_parts(
            Date::new(reference.year(), reference.month(), civil.day()).ok()?,
            Time::midnight(),
        ),
        Granularity::Month => DateTime::from_parts(
            Date::new(reference.year(), civil.month(), 1).ok()?,
            Time::midnight(),
        ),
    };

    shifted.to_zoned(tz.clone()).ok().map(|zoned| zoned.timestamp())
}

/// [`overlap_time`] for every point, re-sorted.
pub fn overlap_points(
    granularity: Granularity,
    points: &[PlotPoint],
    tz: &TimeZone,
) -> Vec<PlotPoint> {
    let mut shifted: Vec<PlotPoint> = points
        .iter()
        .filter_map(|point| {
            Some(PlotPoint {
                time: overlap_time(granularity, point.time, tz)?,
                ..*point
            })
        })
        .collect();
    shifted.sort_by_key(|p| p.time);
    shifted
}
