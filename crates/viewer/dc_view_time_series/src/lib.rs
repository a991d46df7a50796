//! Projecting series for a chart.
//!
//! Given the active series, [`project`] collapses their points to a [`Granularity`],
//! optionally shifts multiple dates onto one shared timeline ("overlap"), and assigns every
//! metric its own vertical axis with exactly one [active](AxisLayout::active) axis.
//!
//! Everything here is a pure function of its inputs.

mod aggregation;
mod axis;
mod summary;

use std::collections::{BTreeMap, BTreeSet};

use jiff::Timestamp;
use jiff::civil::Date;

use dc_series::{DataPoint, DimensionSet, Series, SeriesId, TimeZoneSetting};

pub use self::aggregation::{
    AverageAggregator, Granularity, OVERLAP_REFERENCE_DATE, overlap_points, overlap_time,
};
pub use self::axis::{
    Axis, AxisLayout, AxisOverride, AxisSettings, IRRADIANCE_RANGE, Range1D, default_range,
    is_irradiance_metric, layout_axes, make_range_sane,
};
pub use self::summary::{SeriesSummary, time_integral};

/// A point as drawn.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PlotPoint {
    pub time: Timestamp,
    pub value: f64,

    /// How many original points were averaged into this one.
    pub count: usize,
}

impl PlotPoint {
    #[inline]
    pub fn new(time: Timestamp, value: f64) -> Self {
        Self {
            time,
            value,
            count: 1,
        }
    }
}

impl From<DataPoint> for PlotPoint {
    #[inline]
    fn from(point: DataPoint) -> Self {
        Self::new(point.time, point.value)
    }
}

/// A [`Series`] as drawn: same identity, projected points.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PlotSeries {
    pub id: SeriesId,
    pub name: String,
    pub metric_name: String,
    pub unit: String,
    pub date: Date,
    pub dimensions: DimensionSet,

    /// Sorted by time.
    pub points: Vec<PlotPoint>,

    /// Over the original, unaggregated points.
    pub summary: Option<SeriesSummary>,
}

/// Everything that shapes a projection besides the series themselves.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct ProjectionOptions {
    pub granularity: Granularity,

    /// Shift all dates onto [`OVERLAP_REFERENCE_DATE`]. Only has an effect when the
    /// series span more than one date.
    pub overlap: bool,

    /// Zone days and months are bucketed in.
    pub time_zone: TimeZoneSetting,

    /// Multiplies both bounds of every axis.
    pub scale: f64,

    /// Per metric name.
    pub overrides: BTreeMap<String, AxisOverride>,

    /// Hovered or clicked metric.
    pub focused_metric: Option<String>,

    pub hidden_metrics: BTreeSet<String>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            overlap: false,
            time_zone: TimeZoneSetting::default(),
            scale: 1.0,
            overrides: BTreeMap::new(),
            focused_metric: None,
            hidden_metrics: BTreeSet::new(),
        }
    }
}

impl ProjectionOptions {
    fn axis_settings(&self) -> AxisSettings<'_> {
        AxisSettings {
            overrides: &self.overrides,
            focused_metric: self.focused_metric.as_deref(),
            hidden_metrics: &self.hidden_metrics,
            scale: self.scale,
        }
    }
}

/// What a chart needs to draw the active series.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Projection {
    pub series: Vec<PlotSeries>,
    pub axes: AxisLayout,

    /// Whether the points were shifted onto the shared reference timeline.
    pub overlapped: bool,
}

/// Aggregates, optionally overlaps, and lays out axes for `active` series.
pub fn project<'a>(
    active: impl IntoIterator<Item = &'a Series>,
    options: &ProjectionOptions,
) -> Projection {
    let active: Vec<&Series> = active.into_iter().collect();
    let tz = options.time_zone.to_jiff_time_zone();

    let distinct_dates = active.iter().map(|s| s.date).collect::<BTreeSet<_>>().len();
    let overlapped = options.overlap && distinct_dates > 1;

    let series: Vec<PlotSeries> = active
        .iter()
        .map(|s| {
            let points: Vec<PlotPoint> = s.data.iter().copied().map(PlotPoint::from).collect();
            let points = AverageAggregator::aggregate(options.granularity, &points, &tz);
            let points = if overlapped {
                overlap_points(options.granularity, &points, &tz)
            } else {
                points
            };

            PlotSeries {
                id: s.id,
                name: s.name.clone(),
                metric_name: s.metric_name.clone(),
                unit: s.unit.clone(),
                date: s.date,
                dimensions: s.dimensions.clone(),
                points,
                summary: SeriesSummary::from_points(&s.data),
            }
        })
        .collect();

    let axes = layout_axes(&series, &options.axis_settings());

    dc_log::trace!(
        "Projected {} series onto {} axes at {} granularity (overlap: {overlapped})",
        series.len(),
        axes.axes.len(),
        options.granularity
    );

    Projection {
        series,
        axes,
        overlapped,
    }
}
