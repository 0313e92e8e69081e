//! tbs CLI - utilities around the tbs build engine

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    tbs::util::log::init(cli.verbose);

    match cli.command {
        Commands::Env(args) => commands::env::execute(args),
        Commands::Need(args) => commands::need::execute(args),
        Commands::Files(args) => commands::files::execute(args),
    }
}
