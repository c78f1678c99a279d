//! qarag - grounded question answering over question/answer transcripts
//!
//! Turns a plain-text transcript made of `Q:` / `A:` pairs into a small
//! retrieval-augmented question answering pipeline.
//!
//! # Overview
//!
//! - Segment the transcript into one chunk per question/answer pair
//! - Embed each chunk and persist the vectors in a SQLite index
//! - Retrieve the closest chunks for a question and answer strictly from them,
//!   replying with a fixed refusal when the chunks do not contain the answer
//!
//! # Architecture
//!
//! - `config` - Settings and prompt templates
//! - `source` - Transcript sources
//! - `chunking` - Question/answer chunking state machine
//! - `embedding` - Embedding service abstraction
//! - `vector_store` - In-memory index and its persistence
//! - `indexer` - Index building and loading
//! - `rag` - Retrieval, prompt composition and generation
//! - `session` - Pull-based question loop
//! - `orchestrator` - Pipeline wiring
//!
//! # Example
//!
//! ```rust,no_run
//! use qarag::config::Settings;
//! use qarag::orchestrator::Orchestrator;
//! use qarag::source::FileSource;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator.ingest(&FileSource::new("data/book.txt")).await?;
//!     println!("Indexed {} chunks", result.chunks_indexed);
//!
//!     let engine = orchestrator.engine()?;
//!     println!("{}", engine.ask("What color is the boat?").await?.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod indexer;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod source;
pub mod vector_store;

#[cfg(test)]
mod testing;

pub use error::{QaragError, Result};
