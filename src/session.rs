//! Line-oriented question loop.
//!
//! Queries are pulled from a [`QuerySource`], so a terminal, a script file and a test
//! all drive the same loop. A failed query is reported and the loop moves on.

use crate::error::Result;
use crate::rag::RagEngine;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::warn;

/// Prompt shown before each interactive read.
pub const DEFAULT_PROMPT: &str = "\nAsk a question (or 'exit'): ";

/// Producer of queries; `None` ends the session.
pub trait QuerySource {
    fn next_query(&mut self) -> Result<Option<String>>;
}

/// Whether `input` is the command that ends the loop.
pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}

/// Reads one query per line, printing a prompt first.
///
/// End of input and `exit` (any case) both end the session. Blank lines are skipped.
pub struct LineQuerySource<R, W> {
    reader: R,
    prompt_out: W,
    prompt: String,
}

impl<R: BufRead, W: Write> LineQuerySource<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self {
            reader,
            prompt_out,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

impl<R: BufRead, W: Write> QuerySource for LineQuerySource<R, W> {
    fn next_query(&mut self) -> Result<Option<String>> {
        loop {
            write!(self.prompt_out, "{}", self.prompt)?;
            self.prompt_out.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if is_exit(query) {
                return Ok(None);
            }
            return Ok(Some(query.to_string()));
        }
    }
}

/// Pre-recorded queries, consumed in order.
///
/// An `exit` entry stops the session early, same as at the terminal.
#[derive(Debug, Default)]
pub struct ScriptedQuerySource {
    queries: VecDeque<String>,
}

impl ScriptedQuerySource {
    pub fn new<I, S>(queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queries: queries.into_iter().map(Into::into).collect(),
        }
    }
}

impl QuerySource for ScriptedQuerySource {
    fn next_query(&mut self) -> Result<Option<String>> {
        match self.queries.pop_front() {
            Some(q) if is_exit(&q) => Ok(None),
            other => Ok(other),
        }
    }
}

/// Outcome counts for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Answer queries from `source` until it is exhausted, writing results to `out`.
///
/// Per-query failures are written to `out` and counted; any other error ends the session.
pub async fn run_session<S, W>(engine: &RagEngine, source: &mut S, out: &mut W) -> Result<SessionSummary>
where
    S: QuerySource + ?Sized,
    W: Write + ?Sized,
{
    let mut summary = SessionSummary::default();

    while let Some(query) = source.next_query()? {
        match engine.ask(&query).await {
            Ok(response) => {
                writeln!(out, "\nAnswer:\n {}", response.answer)?;
                summary.answered += 1;
            }
            Err(e) if e.is_per_query() => {
                warn!("Query failed: {}", e);
                writeln!(out, "\nError: {}", e)?;
                summary.failed += 1;
            }
            Err(e) => return Err(e),
        }
        out.flush()?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REFUSAL;
    use crate::indexer::EmbeddingIndex;
    use crate::rag::{AnswerComposer, Retriever};
    use crate::testing::{FailingGenerator, GroundedGenerator, KeywordEmbedder};
    use crate::vector_store::MemoryIndexStore;
    use std::io::Cursor;
    use std::sync::Arc;

    async fn engine_with(
        generator: Arc<dyn crate::rag::Generator>,
        transcript: &str,
    ) -> RagEngine {
        let embedder = Arc::new(KeywordEmbedder::new());
        let chunks = crate::chunking::segment(transcript);
        let index = EmbeddingIndex::new(embedder.clone(), Arc::new(MemoryIndexStore::new()))
            .build(&chunks)
            .await
            .unwrap();
        RagEngine::new(
            Retriever::new(Arc::new(index), embedder).unwrap(),
            AnswerComposer::new(generator),
        )
    }

    #[test]
    fn test_line_source_stops_on_exit_any_case() {
        let input = Cursor::new("first question\n\n   \nsecond\n  ExIt \nnever read\n");
        let mut prompts = Vec::new();
        let mut source = LineQuerySource::new(input, &mut prompts).with_prompt("> ");

        assert_eq!(source.next_query().unwrap(), Some("first question".to_string()));
        assert_eq!(source.next_query().unwrap(), Some("second".to_string()));
        assert_eq!(source.next_query().unwrap(), None);
        drop(source);

        assert_eq!(String::from_utf8(prompts).unwrap(), "> > > > > ");
    }

    #[test]
    fn test_line_source_stops_at_eof() {
        let mut source = LineQuerySource::new(Cursor::new("only\n"), std::io::sink());
        assert_eq!(source.next_query().unwrap(), Some("only".to_string()));
        assert_eq!(source.next_query().unwrap(), None);
    }

    #[test]
    fn test_scripted_source() {
        let mut source = ScriptedQuerySource::new(["a", "EXIT", "b"]);
        assert_eq!(source.next_query().unwrap(), Some("a".to_string()));
        assert_eq!(source.next_query().unwrap(), None);
    }

    #[tokio::test]
    async fn test_session_answers_each_query() {
        let engine = engine_with(
            Arc::new(GroundedGenerator::new()),
            "Q: What color is the boat?\nA: Blue.\n\nQ: How many sailors?\nA: Three.\n",
        )
        .await;
        let mut source = ScriptedQuerySource::new(["What color is the boat?", "Who built the lighthouse?"]);
        let mut out = Vec::new();

        let summary = run_session(&engine, &mut source, &mut out).await.unwrap();
        assert_eq!(summary, SessionSummary { answered: 2, failed: 0 });

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Answer:\n Blue."));
        assert!(text.contains(&format!("Answer:\n {}", REFUSAL)));
    }

    #[tokio::test]
    async fn test_generation_error_keeps_loop_alive() {
        let engine = engine_with(Arc::new(FailingGenerator), "Q: a boat?\nA: yes.\n").await;
        let mut source = ScriptedQuerySource::new(["boat?", "boat again?"]);
        let mut out = Vec::new();

        let summary = run_session(&engine, &mut source, &mut out).await.unwrap();
        assert_eq!(summary, SessionSummary { answered: 0, failed: 2 });
        assert!(String::from_utf8(out).unwrap().contains("Answer generation failed"));
    }

    #[tokio::test]
    async fn test_empty_index_keeps_loop_alive() {
        let engine = engine_with(Arc::new(GroundedGenerator::new()), "no markers here\n").await;
        let mut source = ScriptedQuerySource::new(["anything?", "still there?"]);
        let mut out = Vec::new();

        let summary = run_session(&engine, &mut source, &mut out).await.unwrap();
        assert_eq!(summary.failed, 2);
        assert!(String::from_utf8(out).unwrap().contains("no chunks"));
    }
}
