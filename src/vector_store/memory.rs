//! In-memory index store.
//!
//! Useful for testing and for ingest-then-query runs in a single process.

use super::{Index, IndexStore};
use crate::error::{QaragError, Result};
use std::sync::RwLock;

/// Keeps the most recently saved index in process memory.
#[derive(Debug, Default)]
pub struct MemoryIndexStore {
    slot: RwLock<Option<Index>>,
}

impl MemoryIndexStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IndexStore for MemoryIndexStore {
    fn save(&self, index: &Index) -> Result<()> {
        let mut slot = self
            .slot
            .write()
            .map_err(|e| QaragError::IndexBuild(format!("Failed to acquire lock: {}", e)))?;
        *slot = Some(index.clone());
        Ok(())
    }

    fn load(&self) -> Result<Index> {
        let slot = self
            .slot
            .read()
            .map_err(|e| QaragError::IndexLoad(format!("Failed to acquire lock: {}", e)))?;
        slot.clone()
            .ok_or_else(|| QaragError::IndexLoad("no index has been built".to_string()))
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::sample_index;

    #[test]
    fn test_load_before_save_fails() {
        let store = MemoryIndexStore::new();
        assert!(matches!(store.load(), Err(QaragError::IndexLoad(_))));
    }

    #[test]
    fn test_save_replaces_previous() {
        let store = MemoryIndexStore::new();
        store.save(&sample_index(&[("old", vec![1.0])])).unwrap();
        store
            .save(&sample_index(&[("new a", vec![1.0]), ("new b", vec![0.5])]))
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.entries()[0].text, "new a");
    }
}
