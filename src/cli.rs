use crate::report::Rendering;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "update-status",
    about = "Report pending updates, kernel upgrades and reboot requirements",
    version,
    author
)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ~/.config/update-status/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Print a one-line, tab-delimited summary (default)
    Summary,

    /// Print the summary fields as a single CSV row
    Csv,

    /// Print the upgradable packages and every status field on separate lines
    Detail,

    /// Print the full snapshot as JSON
    Json,

    /// Refresh the package cache (apt-get update) without reporting
    Refresh,
}

impl Cli {
    /// The subcommand to run, falling back to the one-line summary.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Summary)
    }
}

impl Commands {
    /// How a reporting subcommand prints its snapshot; `None` for `refresh`.
    pub fn rendering(self) -> Option<Rendering> {
        match self {
            Commands::Summary => Some(Rendering::OneLine),
            Commands::Csv => Some(Rendering::Csv),
            Commands::Detail => Some(Rendering::Detail),
            Commands::Json => Some(Rendering::Json),
            Commands::Refresh => None,
        }
    }
}
