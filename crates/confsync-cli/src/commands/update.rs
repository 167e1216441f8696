use crate::diff_formatter;
use anyhow::{Context, Result};
use clap::Args;
use confsync_application::{RunOptions, SyncOrchestrator};
use confsync_infrastructure::{
    ConfEngineApi, TokenStorage, YamlMappingReader, YouTubeApiClient, YouTubeAuth, build_client,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Mapping YAML file
    #[arg(short, long)]
    mapping: PathBuf,

    /// Conference ID; must match the mapping file when given
    #[arg(long)]
    conf_id: Option<String>,

    /// OAuth client secrets (credentials.json)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// OAuth token file
    #[arg(long)]
    token: Option<PathBuf>,

    /// Show what would change without updating anything
    #[arg(long)]
    dry_run: bool,

    /// Only update titles and descriptions
    #[arg(long)]
    skip_playlist: bool,
}

/// Returns `Ok(false)` when the run finished but something failed.
pub async fn run(config_path: Option<&Path>, args: UpdateArgs) -> Result<bool> {
    let config = super::load_config(config_path).await?;
    let client = build_client(&config.http)?;

    let storage = TokenStorage::new(
        args.credentials
            .unwrap_or_else(|| config.youtube.credentials_path.clone()),
        args.token.unwrap_or_else(|| config.youtube.token_path.clone()),
    );
    let access_token = YouTubeAuth::new(client.clone(), storage)
        .with_consent_prompt(|url| {
            eprintln!("Open this URL in your browser to authorize confsync:\n\n  {url}\n");
        })
        .access_token()
        .await
        .context("YouTube authentication failed")?;

    let youtube = Arc::new(YouTubeApiClient::new(
        client.clone(),
        &config.youtube.api_base_url,
        access_token,
    ));
    let orchestrator = SyncOrchestrator::new(
        Arc::new(ConfEngineApi::new(client, &config.confengine.base_url)),
        Arc::new(YamlMappingReader::new()),
        youtube.clone(),
        youtube,
    );

    let options = RunOptions {
        dry_run: args.dry_run,
        skip_playlist: args.skip_playlist,
    };
    tracing::debug!(
        "[CLI] update: mapping={} dry_run={} skip_playlist={}",
        args.mapping.display(),
        options.dry_run,
        options.skip_playlist
    );
    let result = orchestrator
        .run(args.conf_id.as_deref(), &args.mapping, options)
        .await?;

    eprint!("{}", diff_formatter::format_result(&result));
    Ok(!result.has_errors())
}
