use std::sync::Arc;

use accord_config::AccordConfig;
use accord_core::input::InputDocument;
use accord_core::rules::StaticRuleSource;
use accord_engine::{ReportFormat, run_standalone};
use anyhow::Context;
use tracing::info;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ScanArgs;
use crate::exit;
use crate::progress::Progress;

/// Handle `accord scan`.
pub async fn handle(args: &ScanArgs, config: &AccordConfig, flags: &GlobalFlags) -> anyhow::Result<i32> {
    let (rules, types) = config
        .standalone
        .documents(args.rules.clone(), args.types.clone())
        .context("scan needs --rules and --types (or [standalone] rules/types in the configuration)")?;

    let source = StaticRuleSource::load(&rules, &types).context("failed to load rule documents")?;
    let input = InputDocument::load(&args.file)
        .with_context(|| format!("failed to load input document {}", args.file.display()))?;
    let workers = args.workers.unwrap_or_else(|| config.engine.worker_count());
    let format = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    info!(file = %args.file.display(), files = input.results.len(), workers, "standalone scan");

    let progress = Arc::new(Progress::bar(
        u64::try_from(input.results.len()).unwrap_or(u64::MAX),
        "evaluating files",
        flags.quiet,
    ));
    let result = run_standalone(
        &input,
        Arc::new(source),
        format,
        std::io::stdout(),
        workers,
        Arc::clone(&progress),
    )
    .await;

    match result {
        Ok(_) => {
            progress.finish_clear();
            Ok(exit::SUCCESS)
        }
        Err(error) => {
            progress.finish_err("scan failed");
            Err(error).context("standalone scan failed")
        }
    }
}
