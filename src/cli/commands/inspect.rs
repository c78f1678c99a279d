//! Inspect command implementation.

use crate::cli::output::content_preview;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the inspect command.
pub fn run_inspect(settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let index = orchestrator.load_index()?;
    let meta = index.meta();

    Output::header("Index");
    Output::kv("Location", &orchestrator.store().location());
    Output::kv("Chunks", &index.len().to_string());
    Output::kv("Embedding model", &meta.embedding_model);
    Output::kv("Dimensions", &meta.dimensions.to_string());
    Output::kv("Built", &meta.built_at.to_rfc3339());

    let configured = &orchestrator.settings().embedding.model;
    if configured != &meta.embedding_model {
        Output::warning(&format!(
            "Configured embedding model '{}' differs from the index; rebuild with 'qarag ingest'.",
            configured
        ));
    }

    if !index.is_empty() {
        Output::header("Chunks");
        for entry in index.entries() {
            println!("  {:>4}  {}", entry.order + 1, content_preview(&entry.text, 80));
        }
    }

    Ok(())
}
