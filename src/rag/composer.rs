//! Grounded answer composition.

use super::generator::{GenerationOptions, Generator};
use crate::config::{Prompts, REFUSAL};
use crate::error::{QaragError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Join retrieved chunk texts into the prompt's context block.
pub fn format_context(retrieved: &[String]) -> String {
    retrieved.join("\n\n")
}

/// Builds the grounded prompt and asks the generator for an answer.
pub struct AnswerComposer {
    generator: Arc<dyn Generator>,
    prompts: Prompts,
    options: GenerationOptions,
}

impl AnswerComposer {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self {
            generator,
            prompts: Prompts::default(),
            options: GenerationOptions::deterministic(),
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Render the prompt for `query` over `retrieved`.
    pub fn build_prompt(&self, query: &str, retrieved: &[String]) -> String {
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context(retrieved));
        vars.insert("question".to_string(), query.to_string());
        vars.insert("refusal".to_string(), REFUSAL.to_string());

        self.prompts.render_with_custom(&self.prompts.rag.template, &vars)
    }

    /// Answer `query` from `retrieved` context.
    ///
    /// The model's text is returned as-is; whether it stayed within the context is not checked.
    /// With nothing retrieved there is nothing to ground on, so the refusal is returned directly.
    #[instrument(skip(self, retrieved), fields(chunks = retrieved.len()))]
    pub async fn compose(&self, query: &str, retrieved: &[String]) -> Result<String> {
        if retrieved.is_empty() {
            debug!("No context retrieved, refusing without calling the model");
            return Ok(REFUSAL.to_string());
        }

        let prompt = self.build_prompt(query, retrieved);
        self.generator
            .generate(&prompt, &self.options)
            .await
            .map_err(|e| match e {
                QaragError::Generation(_) => e,
                other => QaragError::Generation(other.to_string()),
            })
    }
}
