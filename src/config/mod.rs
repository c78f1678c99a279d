//! Configuration module for qarag.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, RagPrompts, REFUSAL};
pub use settings::{
    EmbeddingSettings, GeneralSettings, IndexSettings, PromptSettings, ProviderSettings,
    RagSettings, Settings, SourceSettings,
};
