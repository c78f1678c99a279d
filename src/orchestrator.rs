//! Pipeline orchestrator for qarag.
//!
//! Builds every component once from [`Settings`] and runs ingestion
//! (source → chunks → index) or opens a query engine over the stored index.

use crate::chunking::{Chunker, QaChunker};
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::Result;
use crate::indexer::EmbeddingIndex;
use crate::rag::{AnswerComposer, Generator, OpenAIGenerator, RagEngine, Retriever};
use crate::source::TextSource;
use crate::vector_store::{Index, IndexStore, SqliteIndexStore};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The main orchestrator for the qarag pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    chunker: Box<dyn Chunker>,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn Generator>,
    store: Arc<dyn IndexStore>,
}

impl Orchestrator {
    /// Create an orchestrator talking to the configured services and index file.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;

        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let embedder = Arc::new(OpenAIEmbedder::from_settings(
            &settings.provider,
            &settings.embedding,
        )?);
        let generator = Arc::new(OpenAIGenerator::from_settings(&settings.provider, &settings.rag)?);
        let store = Arc::new(SqliteIndexStore::new(settings.index_path()));

        info!(
            "Using {} at {} (embeddings: {}, generation: {})",
            store.location(),
            settings.provider.api_base,
            settings.embedding.model,
            settings.rag.model
        );

        Ok(Self::with_components(settings, prompts, embedder, generator, store))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
        store: Arc<dyn IndexStore>,
    ) -> Self {
        Self {
            settings,
            prompts,
            chunker: Box::new(QaChunker::new()),
            embedder,
            generator,
            store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> Arc<dyn IndexStore> {
        self.store.clone()
    }

    fn indexer(&self) -> EmbeddingIndex {
        EmbeddingIndex::new(self.embedder.clone(), self.store.clone())
    }

    /// Read the source and segment it.
    pub fn chunk_source(&self, source: &dyn TextSource) -> Result<Vec<String>> {
        let document = source.read()?;
        let chunks = self.chunker.segment(&document);
        Ok(chunks.into_iter().map(|c| c.text).collect())
    }

    /// Read, chunk, embed and persist the transcript. Replaces any existing index.
    #[instrument(skip_all, fields(source = %source.describe()))]
    pub async fn ingest(&self, source: &dyn TextSource) -> Result<IngestResult> {
        info!("Chunking transcript...");
        let chunks = self.chunk_source(source)?;
        let largest_chunk_chars = chunks.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        info!(
            "Created {} chunks (largest {} characters)",
            chunks.len(),
            largest_chunk_chars
        );
        if chunks.is_empty() {
            warn!("No 'Q:' lines found in {}", source.describe());
        }

        info!("Embedding and indexing...");
        let index = self.indexer().build(&chunks).await?;

        Ok(IngestResult {
            chunks_indexed: index.len(),
            largest_chunk_chars,
            dimensions: index.meta().dimensions,
            location: self.store.location(),
        })
    }

    /// Load the stored index.
    pub fn load_index(&self) -> Result<Index> {
        self.indexer().load()
    }

    /// Load the index and assemble a query engine over it.
    pub fn engine(&self) -> Result<RagEngine> {
        let index = Arc::new(self.load_index()?);
        self.engine_for(index)
    }

    /// Assemble a query engine over an already loaded index.
    pub fn engine_for(&self, index: Arc<Index>) -> Result<RagEngine> {
        let retriever =
            Retriever::new(index, self.embedder.clone())?.with_default_k(self.settings.rag.top_k);
        let composer = AnswerComposer::new(self.generator.clone()).with_prompts(self.prompts.clone());
        Ok(RagEngine::new(retriever, composer))
    }
}

/// Result of an ingestion run.
#[derive(Debug)]
pub struct IngestResult {
    /// Number of chunks written to the index.
    pub chunks_indexed: usize,
    /// Length of the longest chunk, in characters.
    pub largest_chunk_chars: usize,
    /// Embedding dimensions.
    pub dimensions: usize,
    /// Where the index was written.
    pub location: String,
}
