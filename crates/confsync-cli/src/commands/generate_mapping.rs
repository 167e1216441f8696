use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use confsync_application::GenerateMappingUseCase;
use confsync_infrastructure::{ConfEngineApi, YamlMappingTemplateWriter, build_client};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct GenerateMappingArgs {
    /// Conference ID (e.g. scrum-fest-osaka-2024)
    conf_id: String,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(config_path: Option<&Path>, args: GenerateMappingArgs) -> Result<bool> {
    let config = super::load_config(config_path).await?;
    let client = build_client(&config.http)?;

    let usecase = GenerateMappingUseCase::new(
        Arc::new(ConfEngineApi::new(client, &config.confengine.base_url)),
        Arc::new(YamlMappingTemplateWriter::new()),
    );
    let generated = usecase
        .execute(&args.conf_id, Local::now().fixed_offset())
        .await?;

    let output_name = match &args.output {
        Some(path) => {
            tokio::fs::write(path, &generated.content)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path.display().to_string()
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(generated.content.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write template to stdout")?;
            "stdout".to_string()
        }
    };

    eprintln!(
        "Generated: {} ({} sessions)",
        output_name, generated.session_count
    );
    Ok(true)
}
