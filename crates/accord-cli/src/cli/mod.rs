use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::GlobalFlags;
pub use root_commands::Commands;

/// Top-level CLI parser for the `accord` binary.
#[derive(Debug, Parser)]
#[command(
    name = "accord",
    version,
    about = "accord - license compatibility for scanned files and packages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file layered above the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}
