mod aggregate_cmd;
mod cli;
mod config;
mod convert;
mod logging;
mod tss_cmd;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Aggregate(args) => aggregate_cmd::run(args),
        Command::Tss(args) => tss_cmd::run(args),
    }
}
