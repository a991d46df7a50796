//! The `datacurve` command line tool.

mod commands;

use clap::Parser as _;

use crate::commands::Command;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

fn main() -> std::process::ExitCode {
    dc_log::setup_logging();

    let args = Args::parse();

    match args.command.run() {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            dc_log::error!("{err:#}");
            std::process::ExitCode::FAILURE
        }
    }
}
