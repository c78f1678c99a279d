//! Embeddings from an OpenAI-compatible endpoint.

use super::Embedder;
use crate::config::{EmbeddingSettings, ProviderSettings};
use crate::error::{QaragError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Requests per embeddings call.
const BATCH_SIZE: usize = 64;

/// Embedder backed by the `/embeddings` API.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<usize>,
}

impl OpenAIEmbedder {
    /// Create an embedder from configuration.
    pub fn from_settings(provider: &ProviderSettings, embedding: &EmbeddingSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(provider)?,
            model: embedding.model.clone(),
            dimensions: embedding.dimensions.map(|d| d as usize),
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| QaragError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(batch.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions as u32);
            }
            let request = args
                .build()
                .map_err(|e| QaragError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| QaragError::Embedding(format!("Embedding API error: {}", e)))?;

            if response.data.len() != batch.len() {
                return Err(QaragError::Embedding(format!(
                    "Requested {} embeddings, service returned {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);
            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
