mod cli;
mod config;
mod convert;
mod logging;
mod lump_cmd;
mod matrix_cmd;
mod output;
mod params_cmd;
mod simulate_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Params(args) => params_cmd::run(args),
        Command::Matrix(args) => matrix_cmd::run(args),
        Command::Lump(args) => lump_cmd::run(args),
        Command::Simulate(args) => simulate_cmd::run(args),
    }
}
