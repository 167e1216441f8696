pub mod generate_mapping;
pub mod update;

use anyhow::{Context, Result};
use confsync_infrastructure::AppConfig;
use std::path::Path;

/// Loads `config.toml`, from `path` when given.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    AppConfig::load(path)
        .await
        .context("Failed to load configuration")
}
