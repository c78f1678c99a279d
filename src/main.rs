//! qarag CLI entry point.

use anyhow::Result;
use clap::Parser;
use qarag::cli::{commands, Cli, Commands};
use qarag::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("qarag={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Ingest { path, dry_run } => {
            commands::run_ingest(path.clone(), *dry_run, settings).await?;
        }

        Commands::Ask {
            question,
            model,
            k,
            sources,
        } => {
            commands::run_ask(question, model.clone(), *k, *sources, settings).await?;
        }

        Commands::Search { query, k, json } => {
            commands::run_search(query, *k, *json, settings).await?;
        }

        Commands::Chat { model } => {
            commands::run_chat(model.clone(), settings).await?;
        }

        Commands::Inspect => {
            commands::run_inspect(settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
