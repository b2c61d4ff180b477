use accord_config::AccordConfig;
use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load `.env` and the layered configuration.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AccordConfig> {
    AccordConfig::load_with_dotenv(flags.config.as_deref()).with_context(|| match &flags.config {
        Some(path) => format!("failed to load configuration from {}", path.display()),
        None => "failed to load configuration".to_string(),
    })
}

/// Open the configured database.
pub async fn open_db(config: &AccordConfig) -> anyhow::Result<accord_db::AccordDb> {
    let path = config.database.path.to_string_lossy();
    accord_db::AccordDb::open_local(&path)
        .await
        .with_context(|| format!("failed to open database at {path}"))
}
