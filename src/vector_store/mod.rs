//! Chunk/vector index and its persistence.
//!
//! An [`Index`] is an ordered list of embedded chunks plus the metadata needed to
//! check that queries are embedded in the same space. [`IndexStore`] implementations
//! decide where an index lives between ingestion and querying.

mod memory;
mod sqlite;

pub use memory::MemoryIndexStore;
pub use sqlite::SqliteIndexStore;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chunk together with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedChunk {
    /// Insertion order of the chunk in the transcript.
    pub order: usize,
    /// Chunk text as produced by the chunker.
    pub text: String,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

/// Facts about how an index was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMeta {
    /// Embedding model the vectors came from.
    pub embedding_model: String,
    /// Length of every vector in the index (0 for an empty index).
    pub dimensions: usize,
    /// When the index was built.
    pub built_at: DateTime<Utc>,
}

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chunk text.
    pub text: String,
    /// Insertion order of the chunk.
    pub order: usize,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// In-memory index, read-only once built or loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    meta: IndexMeta,
    entries: Vec<IndexedChunk>,
}

impl Index {
    /// Assemble an index. Entries must already be in insertion order.
    pub fn new(meta: IndexMeta, entries: Vec<IndexedChunk>) -> Self {
        Self { meta, entries }
    }

    /// Check that entries are ordered and every vector has the recorded dimension.
    pub fn validate(&self) -> std::result::Result<(), String> {
        for (position, entry) in self.entries.iter().enumerate() {
            if entry.order != position {
                return Err(format!(
                    "chunk at position {} has order {}",
                    position, entry.order
                ));
            }
            if entry.embedding.len() != self.meta.dimensions {
                return Err(format!(
                    "chunk {} has {} dimensions, index records {}",
                    entry.order,
                    entry.embedding.len(),
                    self.meta.dimensions
                ));
            }
            if entry.text.trim().is_empty() {
                return Err(format!("chunk {} is empty", entry.order));
            }
        }
        Ok(())
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn entries(&self) -> &[IndexedChunk] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Score every entry against `query` and keep the best `k`.
    ///
    /// Sorted by descending score; equal scores keep insertion order. An entry whose
    /// score is NaN ranks below every real score.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = self
            .entries
            .iter()
            .map(|entry| {
                let score = cosine_similarity(query, &entry.embedding);
                SearchResult {
                    text: entry.text.clone(),
                    order: entry.order,
                    score: if score.is_nan() { f32::NEG_INFINITY } else { score },
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.order.cmp(&b.order)));
        results.truncate(k);
        results
    }
}

/// Where an index is kept between ingestion and querying.
pub trait IndexStore: Send + Sync {
    /// Persist `index`, replacing whatever was stored before.
    fn save(&self, index: &Index) -> Result<()>;

    /// Read the stored index.
    fn load(&self) -> Result<Index>;

    /// Human-readable location for logs.
    fn location(&self) -> String;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
pub(crate) fn sample_index(vectors: &[(&str, Vec<f32>)]) -> Index {
    let dimensions = vectors.first().map(|(_, v)| v.len()).unwrap_or(0);
    let entries = vectors
        .iter()
        .enumerate()
        .map(|(order, (text, embedding))| IndexedChunk {
            order,
            text: text.to_string(),
            embedding: embedding.clone(),
        })
        .collect();
    Index::new(
        IndexMeta {
            embedding_model: "test-model".to_string(),
            dimensions,
            built_at: Utc::now(),
        },
        entries,
    )
}
