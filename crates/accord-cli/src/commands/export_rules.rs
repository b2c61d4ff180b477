use std::io::Write;

use accord_config::AccordConfig;
use anyhow::Context;

use crate::bootstrap;
use crate::cli::root_commands::ExportRulesArgs;
use crate::exit;

/// Handle `accord export-rules`.
pub async fn handle(args: &ExportRulesArgs, config: &AccordConfig) -> anyhow::Result<i32> {
    let db = bootstrap::open_db(config).await?;
    let document = db
        .primary()
        .export_rules()
        .await
        .context("failed to read rules")?;
    let yaml = document.to_yaml_string()?;

    match &args.output {
        Some(path) => std::fs::write(path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(yaml.as_bytes())?;
            stdout.flush()?;
        }
    }

    tracing::info!(rules = document.rules.len(), "rules exported");
    Ok(exit::SUCCESS)
}
