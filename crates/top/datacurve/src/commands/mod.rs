mod dates;
mod export;
mod import;
mod input;
mod project;

use clap::Subcommand;

use self::dates::DatesCommand;
use self::export::ExportCommand;
use self::import::ImportCommand;
use self::project::ProjectCommand;

pub use self::input::{FilterArgs, InputArgs};

// ---

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Imports files and lists the series they produce.
    ///
    /// Reads from standard input if no paths are specified (or for `-`).
    ///
    /// Example: `datacurve import weather.csv solar.json`
    Import(ImportCommand),

    /// Lists the dates covered by the imported series, ascending.
    ///
    /// Example: `datacurve dates weather.csv`
    Dates(DatesCommand),

    /// Projects the selected series for a chart and prints the result as JSON:
    /// aggregated points per series plus one axis per metric.
    ///
    /// Example: `datacurve project *.csv --date 2026-01-28 --date 2026-01-29 --overlap`
    Project(ProjectCommand),

    /// Writes the selected series back out as one table (`日期`, `时间`, dimensions, metrics).
    ///
    /// The format follows the output extension, `.csv` or `.json`.
    ///
    /// Example: `datacurve export weather.csv --date 2026-01-28 --output day.csv`
    Export(ExportCommand),
}

impl Command {
    pub fn run(self) -> anyhow::Result<()> {
        match self {
            Self::Import(cmd) => cmd.run(),
            Self::Dates(cmd) => cmd.run(),
            Self::Project(cmd) => cmd.run(),
            Self::Export(cmd) => cmd.run(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct Args {
        #[command(subcommand)]
        command: Command,
    }

    #[test]
    fn test_parse_project() {
        let args = Args::try_parse_from([
            "datacurve",
            "project",
            "a.csv",
            "b.json",
            "--time-zone",
            "utc",
            "--date",
            "2026-01-28",
            "--dim",
            "城市=南宁",
            "--granularity",
            "day",
            "--overlap",
            "--range",
            "温度=0:40",
            "--hide",
            "湿度",
        ])
        .unwrap();

        let Command::Project(cmd) = args.command else {
            panic!("expected the project command");
        };
        let options = cmd.projection_options().unwrap();
        assert_eq!(options.granularity, dc_view_time_series::Granularity::Day);
        assert!(options.overlap);
        assert_eq!(options.time_zone, dc_series::TimeZoneSetting::Utc);
        assert_eq!(options.overrides["温度"].max, Some(40.0));
        assert!(options.hidden_metrics.contains("湿度"));
    }

    #[test]
    fn test_reject_bad_granularity() {
        assert!(Args::try_parse_from(["datacurve", "project", "--granularity", "week"]).is_err());
    }
}
