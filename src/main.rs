mod agents;
mod cli;
mod config;
mod error;
mod report;
mod status;
mod system;
mod workflow;

use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::Config;
use std::process;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result =
        Config::load(cli.config.as_deref()).and_then(|config| match cli.command().rendering() {
            Some(rendering) => workflow::execute_report(&config, rendering),
            None => workflow::execute_refresh(&config),
        });

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
