//! Configuration settings for qarag.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub source: SourceSettings,
    pub provider: ProviderSettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub rag: RagSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for storing application data.
    pub data_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: "~/.qarag".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Where the transcript text comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Plain-text transcript file (already extracted from its original format).
    pub path: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            path: "data/book.txt".to_string(),
        }
    }
}

/// Connection to the OpenAI-compatible service hosting both models.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Base URL of the API (Ollama exposes one under `/v1`).
    pub api_base: String,
    /// API key. Falls back to `OPENAI_API_KEY`, then to a placeholder local servers accept.
    pub api_key: Option<String>,
    /// HTTP timeout for a single request.
    pub timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:11434/v1".to_string(),
            api_key: None,
            timeout_secs: 300,
        }
    }
}

impl ProviderSettings {
    /// Resolve the key to send with requests.
    pub fn resolved_api_key(&self) -> String {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
            .unwrap_or_else(|| "ollama".to_string())
    }
}

/// Embedding generation settings.
///
/// The same values must be used for building the index and for querying it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested dimensions. `None` keeps the model's native size.
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "nomic-embed-text".to_string(),
            dimensions: None,
        }
    }
}

/// Persisted index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Path to the SQLite index file.
    pub path: String,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: "~/.qarag/index.db".to_string(),
        }
    }
}

/// Retrieval and answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Generation model.
    pub model: String,
    /// Number of chunks retrieved per query.
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            top_k: 3,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.rag.top_k == 0 {
            return Err(crate::error::QaragError::Config(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        if self.embedding.model.trim().is_empty() {
            return Err(crate::error::QaragError::Config(
                "embedding.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::QaragError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("qarag")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded data directory path.
    pub fn data_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.data_dir)
    }

    /// Get the expanded transcript path.
    pub fn source_path(&self) -> PathBuf {
        Self::expand_path(&self.source.path)
    }

    /// Get the expanded index path.
    pub fn index_path(&self) -> PathBuf {
        Self::expand_path(&self.index.path)
    }
}
