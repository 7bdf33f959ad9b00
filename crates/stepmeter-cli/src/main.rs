//! Stepmeter - seasonal electricity allowance tracking from meter photos
//!
//! A CLI that reads meter photos through a vision model, keeps the season's
//! readings ledger, and reports consumption against the step allowance.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
