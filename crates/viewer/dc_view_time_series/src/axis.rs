//! One vertical axis per metric.

use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use crate::PlotSeries;

/// A closed numeric interval.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Range1D {
    pub min: f64,
    pub max: f64,
}

impl Range1D {
    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.max
    }
}

/// Make sure the range is finite and non-empty, so that every axis can be drawn.
pub fn make_range_sane(range: Range1D) -> Range1D {
    let (mut start, mut end) = (range.start(), range.end());

    if !start.is_finite() {
        start = -1.0;
    }
    if !end.is_finite() {
        end = 1.0;
    }

    if end < start {
        (start, end) = (end, start);
    }

    if end <= start {
        let center = f64::midpoint(start, end);
        Range1D::new(center - 1.0, center + 1.0)
    } else {
        Range1D::new(start, end)
    }
}

/// Fixed range of irradiance readings.
pub const IRRADIANCE_RANGE: Range1D = Range1D::new(0.0, 1000.0);

/// Irradiance is physically bounded, so its axis does not follow the data.
pub fn is_irradiance_metric(metric_name: &str) -> bool {
    metric_name.contains("辐照度") || metric_name.to_lowercase().contains("irradiance")
}

/// The range an axis gets from its data alone.
///
/// Both ends get `pad = max(5% of the span, 1)`, except that a negative minimum is
/// extended by 10% of itself instead, and so is a positive maximum.
pub fn default_range(data_min: f64, data_max: f64) -> Range1D {
    let pad = f64::max((data_max - data_min).abs() * 0.05, 1.0);

    let min = if data_min < 0.0 {
        data_min * 1.1
    } else {
        data_min - pad
    };
    let max = if data_max > 0.0 {
        data_max * 1.1
    } else {
        data_max + pad
    };

    Range1D::new(min, max)
}

/// Manually pinned bounds for one metric's axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AxisOverride {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisOverride {
    /// Replaces the bounds that are set, keeps the others.
    pub fn apply(&self, range: Range1D) -> Range1D {
        Range1D::new(
            self.min.unwrap_or(range.min),
            self.max.unwrap_or(range.max),
        )
    }
}

impl std::str::FromStr for AxisOverride {
    type Err = String;

    /// `min:max`, either side may be empty: `0:100`, `:50`, `-10:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (min, max) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected min:max, got {s:?}"))?;

        let parse_bound = |bound: &str| -> Result<Option<f64>, String> {
            let bound = bound.trim();
            if bound.is_empty() {
                Ok(None)
            } else {
                bound
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|err| format!("Bad bound {bound:?}: {err}"))
            }
        };

        Ok(Self {
            min: parse_bound(min)?,
            max: parse_bound(max)?,
        })
    }
}

// ----------------------------------------------------------------------------

/// The axis of one metric.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Axis {
    pub metric_name: String,

    /// Unit of the first series of this metric.
    pub unit: String,

    pub range: Range1D,

    pub visible: bool,
}

/// All axes of a chart, in order of first appearance of their metric.
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AxisLayout {
    pub axes: Vec<Axis>,

    /// Index into `axes` of the one axis drawn with ticks and grid lines.
    /// `None` only when there are no axes.
    pub active: Option<usize>,
}

impl AxisLayout {
    pub fn active_axis(&self) -> Option<&Axis> {
        self.axes.get(self.active?)
    }

    pub fn axis(&self, metric_name: &str) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.metric_name == metric_name)
    }
}

/// User-controlled inputs to the axis layout.
#[derive(Clone, Copy, Debug)]
pub struct AxisSettings<'a> {
    pub overrides: &'a BTreeMap<String, AxisOverride>,

    /// Hovered or clicked metric.
    pub focused_metric: Option<&'a str>,

    pub hidden_metrics: &'a BTreeSet<String>,

    /// Multiplies both bounds of every axis.
    pub scale: f64,
}

/// Assigns each distinct metric of `series` an axis.
///
/// The range of an axis is, in order: [`IRRADIANCE_RANGE`] or the [`default_range`] of
/// the plotted values, then the [`AxisOverride`] if any, then scaled by
/// [`AxisSettings::scale`].
///
/// The active axis is the focused metric if it is visible, else the first visible one,
/// else the first one.
pub fn layout_axes(series: &[PlotSeries], settings: &AxisSettings<'_>) -> AxisLayout {
    // Metric -> (unit, value range)
    let mut metrics: IndexMap<&str, (&str, Option<(f64, f64)>)> = IndexMap::new();
    for s in series {
        let (_, value_range) = metrics
            .entry(s.metric_name.as_str())
            .or_insert((s.unit.as_str(), None));
        for point in &s.points {
            *value_range = Some(match *value_range {
                None => (point.value, point.value),
                Some((min, max)) => (min.min(point.value), max.max(point.value)),
            });
        }
    }

    let axes: Vec<Axis> = metrics
        .into_iter()
        .map(|(metric_name, (unit, value_range))| {
            let range = if is_irradiance_metric(metric_name) {
                IRRADIANCE_RANGE
            } else {
                match value_range {
                    Some((min, max)) => default_range(min, max),
                    None => make_range_sane(Range1D::new(f64::NAN, f64::NAN)),
                }
            };

            let range = settings
                .overrides
                .get(metric_name)
                .map_or(range, |axis_override| axis_override.apply(range));

            let range = make_range_sane(Range1D::new(
                range.min * settings.scale,
                range.max * settings.scale,
            ));

            Axis {
                metric_name: metric_name.to_owned(),
                unit: unit.to_owned(),
                range,
                visible: !settings.hidden_metrics.contains(metric_name),
            }
        })
        .collect();

    let focused = settings.focused_metric.and_then(|focused| {
        axes.iter()
            .position(|axis| axis.visible && axis.metric_name == focused)
    });
    let active = focused
        .or_else(|| axes.iter().position(|axis| axis.visible))
        .or_else(|| (!axes.is_empty()).then_some(0));

    AxisLayout { axes, active }
}
