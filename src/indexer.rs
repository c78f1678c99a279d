//! Building and loading the embedding index.

use crate::embedding::Embedder;
use crate::error::{QaragError, Result};
use crate::vector_store::{Index, IndexMeta, IndexStore, IndexedChunk};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Embeds chunks and persists them through an [`IndexStore`].
pub struct EmbeddingIndex {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn IndexStore>,
}

impl EmbeddingIndex {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn IndexStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed every chunk, check the vectors, and replace the stored index.
    ///
    /// Chunk order is kept: entry `i` of the index is `chunks[i]`.
    #[instrument(skip_all, fields(chunks = chunks.len(), model = %self.embedder.model_id()))]
    pub async fn build(&self, chunks: &[String]) -> Result<Index> {
        if chunks.is_empty() {
            warn!("Building an empty index; every query against it will fail");
        }

        let vectors = self.embedder.embed_batch(chunks).await.map_err(|e| match e {
            QaragError::Embedding(msg) => QaragError::IndexBuild(msg),
            other => QaragError::IndexBuild(other.to_string()),
        })?;

        let dimensions = check_vectors(chunks.len(), &vectors, self.embedder.dimensions())?;

        let entries = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(order, (text, embedding))| IndexedChunk {
                order,
                text: text.clone(),
                embedding,
            })
            .collect();

        let index = Index::new(
            IndexMeta {
                embedding_model: self.embedder.model_id().to_string(),
                dimensions,
                built_at: Utc::now(),
            },
            entries,
        );
        index.validate().map_err(QaragError::IndexBuild)?;

        self.store.save(&index)?;
        info!(
            "Indexed {} chunks ({} dimensions) at {}",
            index.len(),
            dimensions,
            self.store.location()
        );

        Ok(index)
    }

    /// Read the stored index.
    pub fn load(&self) -> Result<Index> {
        self.store.load()
    }
}

/// Check one vector per chunk, all non-empty and of one length. Returns that length.
fn check_vectors(expected: usize, vectors: &[Vec<f32>], declared: Option<usize>) -> Result<usize> {
    if vectors.len() != expected {
        return Err(QaragError::IndexBuild(format!(
            "embedding service returned {} vectors for {} chunks",
            vectors.len(),
            expected
        )));
    }

    let Some(first) = vectors.first() else {
        return Ok(declared.unwrap_or(0));
    };
    let dimensions = first.len();

    if dimensions == 0 {
        return Err(QaragError::IndexBuild(
            "embedding service returned an empty vector".to_string(),
        ));
    }
    if let Some(declared) = declared {
        if declared != dimensions {
            return Err(QaragError::IndexBuild(format!(
                "expected {}-dimensional embeddings, service returned {}",
                declared, dimensions
            )));
        }
    }
    if let Some((position, bad)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != dimensions)
    {
        return Err(QaragError::IndexBuild(format!(
            "chunk {} embedded to {} dimensions, expected {}",
            position,
            bad.len(),
            dimensions
        )));
    }
    if let Some(position) = vectors
        .iter()
        .position(|v| v.iter().any(|x| !x.is_finite()))
    {
        return Err(QaragError::IndexBuild(format!(
            "chunk {} embedded to a vector with non-finite components",
            position
        )));
    }

    Ok(dimensions)
}
