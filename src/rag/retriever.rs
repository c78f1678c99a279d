//! Query-time similarity search over a loaded index.

use crate::embedding::Embedder;
use crate::error::{QaragError, Result};
use crate::vector_store::{Index, SearchResult};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of chunks retrieved when the caller does not say otherwise.
pub const DEFAULT_TOP_K: usize = 3;

/// Embeds queries and ranks indexed chunks by cosine similarity.
pub struct Retriever {
    index: Arc<Index>,
    embedder: Arc<dyn Embedder>,
    default_k: usize,
}

impl Retriever {
    /// Pair a loaded index with the embedder used for queries.
    ///
    /// Fails when the index was built with a different embedding model.
    pub fn new(index: Arc<Index>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let indexed = &index.meta().embedding_model;
        if indexed != embedder.model_id() {
            return Err(QaragError::EmbeddingMismatch {
                indexed: indexed.clone(),
                query: embedder.model_id().to_string(),
            });
        }

        Ok(Self {
            index,
            embedder,
            default_k: DEFAULT_TOP_K,
        })
    }

    /// Set the number of results used by [`Retriever::search_default`].
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Return the `k` chunks most similar to `query`.
    ///
    /// Fewer than `k` come back only when the index is smaller than `k`.
    #[instrument(skip(self, query))]
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Err(QaragError::InvalidInput(
                "k must be a positive integer".to_string(),
            ));
        }
        if self.index.is_empty() {
            return Err(QaragError::EmptyIndex);
        }

        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.len() != self.index.meta().dimensions {
            return Err(QaragError::Embedding(format!(
                "query embedded to {} dimensions, index has {}",
                query_embedding.len(),
                self.index.meta().dimensions
            )));
        }
        if query_embedding.iter().any(|x| !x.is_finite()) {
            return Err(QaragError::Embedding(
                "query embedding has non-finite components".to_string(),
            ));
        }

        let results = self.index.top_k(&query_embedding, k);
        debug!(
            "Retrieved {} chunks, best score {:.3}",
            results.len(),
            results.first().map(|r| r.score).unwrap_or_default()
        );
        Ok(results)
    }

    /// Search with the configured default `k`.
    pub async fn search_default(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.search(query, self.default_k).await
    }
}
