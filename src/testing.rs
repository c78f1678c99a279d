//! Stub embedding and generation services for tests.

use crate::config::REFUSAL;
use crate::embedding::Embedder;
use crate::error::{QaragError, Result};
use crate::rag::{GenerationOptions, Generator};
use async_trait::async_trait;
use std::sync::Mutex;

const STOP_WORDS: &[&str] = &[
    "the", "and", "what", "how", "who", "why", "was", "were", "are", "for", "with", "does", "did",
    "many", "much", "this", "that", "from", "into", "his", "her", "its", "their", "which",
];

/// Content words of `text`: lowercase, alphanumeric, no stop words.
pub fn keywords(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Bag-of-words embedder: each keyword bumps one hashed bucket.
pub struct KeywordEmbedder {
    dimensions: usize,
}

impl KeywordEmbedder {
    pub const MODEL: &'static str = "keyword-test";

    pub fn new() -> Self {
        Self { dimensions: 64 }
    }

    fn vector(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dimensions];
        for word in keywords(text) {
            let hash = word
                .bytes()
                .fold(2166136261u32, |acc, b| (acc ^ b as u32).wrapping_mul(16777619));
            vector[hash as usize % self.dimensions] += 1.0;
        }
        vector
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.vector(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    fn model_id(&self) -> &str {
        Self::MODEL
    }
}

/// Embedding service that is never reachable.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(QaragError::Embedding("connection refused".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(QaragError::Embedding("connection refused".to_string()))
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

/// Returns a vector one element longer for every text in the batch.
pub struct RaggedEmbedder;

#[async_trait]
impl Embedder for RaggedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok((0..texts.len()).map(|i| vec![1.0; i + 1]).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }

    fn model_id(&self) -> &str {
        "ragged"
    }
}

/// Two-dimensional embedder whose vectors contain NaN. Shares the sample index's model id.
pub struct NonFiniteEmbedder;

#[async_trait]
impl Embedder for NonFiniteEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![f32::NAN, 1.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![f32::NAN, 1.0]).collect())
    }

    fn dimensions(&self) -> Option<usize> {
        Some(2)
    }

    fn model_id(&self) -> &str {
        "test-model"
    }
}

/// Answers from the prompt's context when a question keyword appears in it,
/// otherwise gives the refusal. Records every prompt and temperature it sees.
#[derive(Default)]
pub struct GroundedGenerator {
    pub calls: Mutex<Vec<(String, f32)>>,
}

impl GroundedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn section<'a>(prompt: &'a str, start: &str, end: &str) -> &'a str {
        let from = prompt.find(start).map(|i| i + start.len()).unwrap_or(prompt.len());
        let rest = &prompt[from..];
        let to = rest.find(end).unwrap_or(rest.len());
        &rest[..to]
    }
}

#[async_trait]
impl Generator for GroundedGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((prompt.to_string(), options.temperature));
        }

        let context = Self::section(prompt, "Context:\n", "\n\nQuestion:");
        let question = Self::section(prompt, "Question:\n", "\n\nAnswer:");

        let lowered = context.to_lowercase();
        let grounded = keywords(question).iter().any(|k| lowered.contains(k.as_str()));
        if !grounded {
            return Ok(REFUSAL.to_string());
        }

        let answer = context
            .lines()
            .find(|l| l.trim_start().starts_with("A:"))
            .map(|l| l.trim_start()[2..].trim().to_string())
            .unwrap_or_default();
        Ok(answer)
    }

    fn model_id(&self) -> &str {
        "grounded-stub"
    }
}

/// Generation service that always fails.
pub struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String> {
        Err(QaragError::Generation("model not loaded".to_string()))
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}
