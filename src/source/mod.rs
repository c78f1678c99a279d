//! Transcript sources.
//!
//! A source hands the pipeline the whole transcript as one newline-normalized string.
//! Pulling text out of binary formats happens before this point.

use crate::error::{QaragError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Something that can supply the raw transcript.
pub trait TextSource {
    /// Read the full transcript.
    fn read(&self) -> Result<String>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Collapse `\r\n` pairs into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Plain-text transcript stored on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn read(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(QaragError::SourceUnavailable(format!(
                "{} does not exist",
                self.path.display()
            )));
        }

        let bytes = std::fs::read(&self.path).map_err(|e| {
            QaragError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let text = String::from_utf8(bytes).map_err(|e| {
            QaragError::SourceUnavailable(format!(
                "{} is not valid UTF-8 text: {}",
                self.path.display(),
                e
            ))
        })?;

        debug!("Read {} bytes of transcript", text.len());
        Ok(normalize_newlines(&text))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory transcript, for scripts and tests.
#[derive(Debug, Clone)]
pub struct StringSource {
    text: String,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl TextSource for StringSource {
    fn read(&self) -> Result<String> {
        Ok(normalize_newlines(&self.text))
    }

    fn describe(&self) -> String {
        format!("<inline transcript, {} bytes>", self.text.len())
    }
}
