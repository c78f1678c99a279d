//! Interactive question loop.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::{run_session, LineQuerySource};
use anyhow::Result;
use console::style;
use std::io;

/// Run the interactive chat command.
pub async fn run_chat(model: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(model) = model {
        settings.rag.model = model;
    }

    let orchestrator = Orchestrator::new(settings)?;
    let engine = orchestrator.engine()?;

    println!("\n{}", style("qarag").bold().cyan());
    println!(
        "{}",
        style(format!(
            "{} chunks loaded. Type a question, or 'exit' to quit.",
            engine.retriever().index().len()
        ))
        .dim()
    );

    let stdin = io::stdin();
    let mut source = LineQuerySource::new(stdin.lock(), io::stdout());
    let mut stdout = io::stdout();

    let summary = run_session(&engine, &mut source, &mut stdout).await?;
    if summary.failed > 0 {
        Output::warning(&format!(
            "{} of {} questions failed",
            summary.failed,
            summary.answered + summary.failed
        ));
    }
    Output::info("Goodbye!");

    Ok(())
}
