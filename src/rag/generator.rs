//! Text generation backends.

use crate::config::{ProviderSettings, RagSettings};
use crate::error::{QaragError, Result};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Sampling options for a generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
}

impl GenerationOptions {
    /// Zero temperature: the same prompt should give (nearly) the same answer.
    pub fn deterministic() -> Self {
        Self { temperature: 0.0 }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Trait for answer generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete `prompt` and return the model's raw text.
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;

    /// Identifier of the generation model.
    fn model_id(&self) -> &str;
}

/// Generator backed by the chat completions API.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    pub fn from_settings(provider: &ProviderSettings, rag: &RagSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(provider)?,
            model: rag.model.clone(),
        })
    }

    /// Use a different model than the configured one.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| QaragError::Generation(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(options.temperature)
            .build()
            .map_err(|e| QaragError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| QaragError::Generation(format!("Chat API error: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .ok_or_else(|| QaragError::Generation("Empty response from model".to_string()))?;

        debug!("Generated {} characters", answer.len());
        Ok(answer)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
