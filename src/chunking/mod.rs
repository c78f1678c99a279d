//! Transcript chunking.
//!
//! Splits a question/answer transcript into retrievable units, one per Q/A pair.

mod qa;

pub use qa::{Action, ChunkState, LineKind, QaChunker, ANSWER_MARKER, QUESTION_MARKER};

use serde::{Deserialize, Serialize};

/// A question/answer unit cut from the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Trimmed text, never empty.
    pub text: String,
    /// Position of this chunk in the transcript, starting at 0.
    pub order: usize,
}

impl Chunk {
    pub fn new(text: String, order: usize) -> Self {
        Self { text, order }
    }
}

/// Trait for chunking implementations.
pub trait Chunker: Send + Sync {
    /// Split a document into ordered chunks.
    fn segment(&self, document: &str) -> Vec<Chunk>;
}

/// Segment with the default question/answer chunker and keep only the texts.
pub fn segment(document: &str) -> Vec<String> {
    QaChunker::new()
        .segment(document)
        .into_iter()
        .map(|c| c.text)
        .collect()
}
