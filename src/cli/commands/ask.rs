//! Ask command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    question: &str,
    model: Option<String>,
    k: Option<usize>,
    show_sources: bool,
    mut settings: Settings,
) -> Result<()> {
    if let Some(model) = model {
        settings.rag.model = model;
    }
    if let Some(k) = k {
        settings.rag.top_k = k;
    }

    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.engine()?;

    let spinner = Output::spinner("Searching transcript...");
    let result = engine.ask(question).await;
    spinner.finish_and_clear();

    match result {
        Ok(response) => {
            println!("\n{}\n", response.answer);

            if show_sources {
                Output::header("Sources");
                for source in &response.sources {
                    Output::search_result(source.order, source.score, &source.text);
                }
            }
            Ok(())
        }
        Err(e) => {
            Output::error(&format!("Failed to generate answer: {}", e));
            Err(e.into())
        }
    }
}
