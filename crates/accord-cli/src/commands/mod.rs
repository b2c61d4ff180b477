use accord_config::AccordConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod agent;
pub mod export_rules;
pub mod scan;

/// Dispatch a parsed command to its handler. Returns the process exit code.
pub async fn dispatch(
    command: Commands,
    config: &AccordConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<i32> {
    match command {
        Commands::Scan(args) => scan::handle(&args, config, flags).await,
        Commands::Agent(args) => agent::handle(&args, config).await,
        Commands::ExportRules(args) => export_rules::handle(&args, config).await,
    }
}
