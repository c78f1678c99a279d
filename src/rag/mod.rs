//! RAG (Retrieval-Augmented Generation) for question answering over the transcript.
//!
//! [`Retriever`] finds the chunks closest to a question, [`AnswerComposer`] turns them
//! into a grounded prompt for a [`Generator`], and [`RagEngine`] runs both for one query.

mod composer;
mod engine;
mod generator;
mod retriever;

pub use composer::{format_context, AnswerComposer};
pub use engine::{RagEngine, RagResponse};
pub use generator::{GenerationOptions, Generator, OpenAIGenerator};
pub use retriever::{Retriever, DEFAULT_TOP_K};
