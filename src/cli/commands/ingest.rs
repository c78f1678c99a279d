//! Ingest command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::source::FileSource;
use anyhow::Result;

/// Run the ingest command.
pub async fn run_ingest(path: Option<String>, dry_run: bool, settings: Settings) -> Result<()> {
    let source = match path {
        Some(p) => FileSource::new(Settings::expand_path(&p)),
        None => FileSource::new(settings.source_path()),
    };

    let orchestrator = Orchestrator::new(settings)?;

    if dry_run {
        let chunks = orchestrator.chunk_source(&source)?;
        let largest = chunks.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        Output::success(&format!("Chunks created: {}", chunks.len()));
        Output::kv("Largest chunk", &format!("{} characters", largest));
        return Ok(());
    }

    Output::info(&format!("Ingesting {}", source.path().display()));
    let spinner = Output::spinner("Chunking and embedding transcript...");
    let result = orchestrator.ingest(&source).await;
    spinner.finish_and_clear();

    match result {
        Ok(result) => {
            if result.chunks_indexed == 0 {
                Output::warning("No 'Q:' lines found; the index is empty.");
            }
            Output::success(&format!("Indexed {} chunks", result.chunks_indexed));
            Output::kv("Largest chunk", &format!("{} characters", result.largest_chunk_chars));
            Output::kv("Dimensions", &result.dimensions.to_string());
            Output::kv("Index", &result.location);
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Ingestion failed: {}", e));
            Err(e.into())
        }
    }
}
