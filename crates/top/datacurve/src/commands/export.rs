use std::path::PathBuf;

use anyhow::Context as _;

use crate::commands::{FilterArgs, InputArgs};

// ---

#[derive(Debug, Clone, clap::Parser)]
pub struct ExportCommand {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    filter: FilterArgs,

    /// Where to write the table. Must end in `.csv` or `.json`.
    #[clap(long, short)]
    output: PathBuf,
}

impl ExportCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let Self {
            input,
            filter,
            output,
        } = self;

        let extension = dc_data_loader::extension(&output);
        anyhow::ensure!(
            dc_data_loader::is_supported_file_extension(&extension),
            "Can only export to .csv or .json, got {output:?}"
        );

        let store = input.load_store()?;
        let filter = filter.to_filter(&store)?;
        let active = dc_series::select_active(&store, &filter);

        let table = dc_data_loader::export_table(active, &input.time_zone.to_jiff_time_zone());
        if table.is_empty() {
            dc_log::warn!("No series matched the filter; {output:?} will have no rows");
        }

        let file = std::fs::File::create(&output)
            .with_context(|| format!("Failed to create {output:?}"))?;
        let writer = std::io::BufWriter::new(file);

        let written = if extension == "json" {
            table.write_json(writer)
        } else {
            table.write_csv(writer)
        };
        written.with_context(|| format!("Failed to write {output:?}"))?;

        dc_log::info!("Wrote {} rows to {output:?}", table.rows.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use dc_series::TimeZoneSetting;

    use super::*;

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("weather.csv");
        std::fs::write(
            &input,
            "城市,日期,时间,温度(°C)\n南宁,2026-01-28,00:00,12.4\n南宁,2026-01-29,00:00,11\n",
        )
        .unwrap();
        let output = dir.path().join("out.csv");

        ExportCommand {
            input: InputArgs {
                paths: vec![input.to_string_lossy().into_owned()],
                time_zone: TimeZoneSetting::Utc,
                continue_on_error: None,
            },
            filter: FilterArgs::default(),
            output: output.clone(),
        }
        .run()
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "日期,时间,城市,温度(°C)\n2026-01-28,00:00:00,南宁,12.4\n"
        );
    }

    #[test]
    fn test_export_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("weather.csv");
        std::fs::write(&input, "日期,时间,温度\n2026-01-28,00:00,12.4\n").unwrap();
        let output = dir.path().join("out.json");

        ExportCommand {
            input: InputArgs {
                paths: vec![input.to_string_lossy().into_owned()],
                time_zone: TimeZoneSetting::Utc,
                continue_on_error: None,
            },
            filter: FilterArgs {
                metrics: vec!["湿度".to_owned()],
                ..Default::default()
            },
            output: output.clone(),
        }
        .run()
        .unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, serde_json::json!([]));
    }

    #[test]
    fn test_export_needs_known_extension() {
        let cmd = ExportCommand {
            input: InputArgs {
                paths: vec![],
                time_zone: TimeZoneSetting::Utc,
                continue_on_error: None,
            },
            filter: FilterArgs::default(),
            output: PathBuf::from("out.xlsx"),
        };
        assert!(cmd.run().is_err());
    }
}
