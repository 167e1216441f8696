//! confsync - keep conference recordings on YouTube in sync with the schedule.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod diff_formatter;

#[derive(Parser)]
#[command(name = "confsync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sync ConfEngine sessions into YouTube titles, descriptions and playlists", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config.toml (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update video titles, descriptions and playlist order from a mapping file
    Update(commands::update::UpdateArgs),

    /// Write an empty mapping template for a conference
    GenerateMapping(commands::generate_mapping::GenerateMappingArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let outcome = match cli.command {
        Commands::Update(args) => commands::update::run(cli.config.as_deref(), args).await,
        Commands::GenerateMapping(args) => {
            commands::generate_mapping::run(cli.config.as_deref(), args).await
        }
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!(
        "warn,confsync={level},confsync_core={level},confsync_application={level},confsync_infrastructure={level}"
    );

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
