use std::io::Write as _;

use crate::commands::InputArgs;

// ---

#[derive(Debug, Clone, clap::Parser)]
pub struct DatesCommand {
    #[command(flatten)]
    input: InputArgs,
}

impl DatesCommand {
    pub fn run(self) -> anyhow::Result<()> {
        let store = self.input.load_store()?;
        let default_date = store.default_date();

        let mut stdout = std::io::stdout().lock();
        for date in store.available_dates() {
            if Some(date) == default_date {
                writeln!(stdout, "{date} (default)")?;
            } else {
                writeln!(stdout, "{date}")?;
            }
        }

        Ok(())
    }
}
