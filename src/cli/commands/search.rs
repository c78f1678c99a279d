//! Search command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, k: Option<usize>, json: bool, settings: Settings) -> Result<()> {
    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.engine()?;
    let retriever = engine.retriever();
    let k = k.unwrap_or_else(|| retriever.default_k());

    let spinner = Output::spinner("Searching...");
    let results = retriever.search(query, k).await;
    spinner.finish_and_clear();

    let results = match results {
        Ok(results) => results,
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    Output::success(&format!("Found {} results", results.len()));
    for result in &results {
        Output::search_result(result.order, result.score, &result.text);
    }

    Ok(())
}
