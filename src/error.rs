//! Error types for qarag.

use thiserror::Error;

/// Library-level error type for qarag operations.
#[derive(Error, Debug)]
pub enum QaragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transcript source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Index build failed: {0}")]
    IndexBuild(String),

    #[error("Index load failed: {0}")]
    IndexLoad(String),

    #[error("The index contains no chunks")]
    EmptyIndex,

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Index was built with embedding model '{indexed}' but queries use '{query}'")]
    EmbeddingMismatch { indexed: String, query: String },

    #[error("Answer generation failed: {0}")]
    Generation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl QaragError {
    /// Whether the error only affects the current query.
    ///
    /// The interactive loop keeps serving after these; anything else ends the session.
    pub fn is_per_query(&self) -> bool {
        matches!(
            self,
            QaragError::EmptyIndex
                | QaragError::Generation(_)
                | QaragError::Embedding(_)
                | QaragError::InvalidInput(_)
        )
    }
}

/// Result type alias for qarag operations.
pub type Result<T> = std::result::Result<T, QaragError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_query_classification() {
        assert!(QaragError::EmptyIndex.is_per_query());
        assert!(QaragError::Generation("down".to_string()).is_per_query());
        assert!(!QaragError::IndexLoad("missing".to_string()).is_per_query());
        assert!(!QaragError::SourceUnavailable("gone".to_string()).is_per_query());
    }
}
