use dc_series::DataPoint;
use itertools::Itertools as _;

/// Statistics of one series, over its original points.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SeriesSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,

    /// Time integral in value·hours, see [`time_integral`].
    pub total: f64,
}

impl SeriesSummary {
    /// `None` for a series without points.
    pub fn from_points(points: &[DataPoint]) -> Option<Self> {
        let first = points.first()?;

        let (min, max, sum) = points.iter().fold(
            (first.value, first.value, 0.0),
            |(min, max, sum), p| (f64::min(min, p.value), f64::max(max, p.value), sum + p.value),
        );

        Some(Self {
            count: points.len(),
            min,
            max,
            mean: sum / points.len() as f64,
            total: time_integral(points),
        })
    }
}

/// Area under the curve by the trapezoid rule, with time in hours.
///
/// Points are taken in time order. Fewer than two points have no area: `0.0`.
pub fn time_integral(points: &[DataPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .iter()
        .sorted_by_key(|p| p.time)
        .tuple_windows()
        .map(|(a, b)| {
            let hours = b.time.duration_since(a.time).as_secs_f64() / 3600.0;
            (a.value + b.value) * 0.5 * hours
        })
        .sum()
}
