use std::io::Write as _;

use itertools::Itertools as _;

use crate::commands::InputArgs;

// ---

#[derive(Debug, Clone, clap::Parser)]
pub struct ImportCommand {
    #[command(flatten)]
    input: InputArgs,

    /// Print the series as JSON instead of one line per series.
    #[clap(long)]
    json: bool,
}

impl ImportCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let Self { input, json } = self;

        let reports = input.load()?;
        let mut stdout = std::io::stdout().lock();

        if json {
            let series = reports.iter().flat_map(|report| &report.series).collect_vec();
            serde_json::to_writer_pretty(&mut stdout, &series)?;
            writeln!(stdout)?;
            return Ok(());
        }

        for report in &reports {
            if report.is_empty() {
                writeln!(
                    stdout,
                    "{}: no valid series produced, check the file",
                    report.source
                )?;
                continue;
            }

            for series in &report.series {
                writeln!(
                    stdout,
                    "{}\t{}\t{}\t{} points",
                    series.date,
                    series.name,
                    series.unit,
                    series.len()
                )?;
            }

            if report.rows_dropped > 0 {
                dc_log::info!(
                    "{}: skipped {}/{} rows without a valid time or numeric value",
                    report.source,
                    report.rows_dropped,
                    report.rows_total
                );
            }
        }

        let store = reports
            .into_iter()
            .fold(dc_series::SeriesStore::new(), |store, report| {
                store.with_imported(report.series)
            });

        if !store.is_empty() {
            writeln!(stdout)?;
            writeln!(stdout, "metrics: {}", store.metric_names().join(", "))?;
            for (key, values) in store.dimension_values() {
                writeln!(stdout, "{key}: {}", values.iter().join(", "))?;
            }
        }

        Ok(())
    }
}
