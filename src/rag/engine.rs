//! Retrieval plus composition for a single question.

use super::{AnswerComposer, Retriever};
use crate::error::Result;
use crate::vector_store::SearchResult;
use serde::Serialize;
use tracing::{info, instrument};

/// RAG engine for question answering.
pub struct RagEngine {
    retriever: Retriever,
    composer: AnswerComposer,
}

impl RagEngine {
    pub fn new(retriever: Retriever, composer: AnswerComposer) -> Self {
        Self {
            retriever,
            composer,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Retrieve context for `question` and generate a grounded answer.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question");

        let sources = self.retriever.search_default(question).await?;
        let texts: Vec<String> = sources.iter().map(|s| s.text.clone()).collect();
        let answer = self.composer.compose(question, &texts).await?;

        Ok(RagResponse { answer, sources })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks the answer was grounded on, best first.
    pub sources: Vec<SearchResult>,
}

impl RagResponse {
    /// Format the response for display.
    pub fn format_for_display(&self) -> String {
        let mut output = self.answer.clone();

        if !self.sources.is_empty() {
            output.push_str("\n\n--- Sources ---\n");
            for source in &self.sources {
                output.push_str(&format!(
                    "\n#{} (score: {:.2}) {}",
                    source.order + 1,
                    source.score,
                    source.text.lines().next().unwrap_or_default()
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REFUSAL;
    use crate::indexer::EmbeddingIndex;
    use crate::testing::{GroundedGenerator, KeywordEmbedder};
    use crate::vector_store::MemoryIndexStore;
    use std::sync::Arc;

    async fn engine() -> RagEngine {
        let embedder = Arc::new(KeywordEmbedder::new());
        let chunks = crate::chunking::segment(
            "Q: What color is the boat?\nA: Blue.\n\nQ: How many sailors?\nA: Three.\n",
        );
        let index = EmbeddingIndex::new(embedder.clone(), Arc::new(MemoryIndexStore::new()))
            .build(&chunks)
            .await
            .unwrap();
        let retriever = Retriever::new(Arc::new(index), embedder).unwrap();
        RagEngine::new(retriever, AnswerComposer::new(Arc::new(GroundedGenerator::new())))
    }

    #[tokio::test]
    async fn test_ask_answers_from_best_chunk() {
        let response = engine().await.ask("What color is the boat?").await.unwrap();
        assert_eq!(response.answer, "Blue.");
        assert_eq!(response.sources.len(), 2);
        assert_eq!(response.sources[0].order, 0);
    }

    #[tokio::test]
    async fn test_ask_refuses_unrelated_question() {
        let response = engine().await.ask("Which lighthouse keeper wrote letters?").await.unwrap();
        assert_eq!(response.answer, REFUSAL);
    }

    #[test]
    fn test_format_for_display() {
        let response = RagResponse {
            answer: "Blue.".to_string(),
            sources: vec![SearchResult {
                text: "Q: What color?\nA: Blue.".to_string(),
                order: 0,
                score: 0.91,
            }],
        };
        let shown = response.format_for_display();
        assert!(shown.starts_with("Blue."));
        assert!(shown.contains("#1 (score: 0.91) Q: What color?"));
    }
}
