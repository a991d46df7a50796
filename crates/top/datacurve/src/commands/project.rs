use std::io::Write as _;

use anyhow::Context as _;
use dc_view_time_series::{AxisOverride, Granularity, ProjectionOptions};

use crate::commands::{FilterArgs, InputArgs};

// ---

#[derive(Debug, Clone, clap::Parser)]
pub struct ProjectCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    filter: FilterArgs,

    /// `hour` keeps the points as they are, `day` and `month` average them.
    #[clap(long, default_value_t = Granularity::Hour)]
    granularity: Granularity,

    /// Shift all selected dates onto one shared timeline.
    #[clap(long)]
    overlap: bool,

    /// Multiplies both bounds of every axis.
    #[clap(long, default_value_t = 1.0)]
    scale: f64,

    /// Pin an axis range, as `metric=min:max`. Either bound may be left out: `功率=0:`.
    /// Can be repeated.
    #[clap(long = "range")]
    ranges: Vec<String>,

    /// The hovered or clicked metric, whose axis is shown if it is visible.
    #[clap(long)]
    focus: Option<String>,

    /// Hide this metric's axis. Can be repeated.
    #[clap(long = "hide")]
    hidden: Vec<String>,
}

impl ProjectCommand {
    pub fn projection_options(&self) -> anyhow::Result<ProjectionOptions> {
        let mut options = ProjectionOptions {
            granularity: self.granularity,
            overlap: self.overlap,
            time_zone: self.input.time_zone.clone(),
            scale: self.scale,
            focused_metric: self.focus.clone(),
            hidden_metrics: self.hidden.iter().cloned().collect(),
            ..Default::default()
        };

        for range in &self.ranges {
            let (metric, bounds) = range
                .rsplit_once('=')
                .with_context(|| format!("Expected metric=min:max, got {range:?}"))?;
            let axis_override = bounds
                .parse::<AxisOverride>()
                .map_err(|err| anyhow::anyhow!(err))
                .with_context(|| format!("Bad range for {metric:?}"))?;
            options
                .overrides
                .insert(metric.trim().to_owned(), axis_override);
        }

        Ok(options)
    }

    pub fn run(self) -> anyhow::Result<()> {
        let options = self.projection_options()?;

        let store = self.input.load_store()?;
        let filter = self.filter.to_filter(&store)?;
        let active = dc_series::select_active(&store, &filter);

        if active.is_empty() {
            dc_log::warn!("No series match the selection");
        }

        let projection = dc_view_time_series::project(active, &options);

        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &projection)?;
        writeln!(stdout)?;

        Ok(())
    }
}
