//! Embedding generation for indexing and retrieval.

mod openai;

pub use openai::OpenAIEmbedder;

use crate::error::Result;
use async_trait::async_trait;

/// Trait for embedding generation.
///
/// Vectors are only comparable when they come from the same `model_id()`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Dimensions the service was asked for, if fixed by configuration.
    fn dimensions(&self) -> Option<usize>;

    /// Identifier of the embedding model, recorded in the index.
    fn model_id(&self) -> &str;
}
