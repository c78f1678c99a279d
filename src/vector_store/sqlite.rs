//! SQLite-backed index store.
//!
//! The whole index lives in one SQLite file: chunk texts with their embeddings as
//! little-endian `f32` blobs, plus a key/value table of build metadata. Saving
//! rewrites both tables in a single transaction.

use super::{Index, IndexMeta, IndexStore, IndexedChunk};
use crate::error::{QaragError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Bumped when the table layout changes.
const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS index_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chunks (
    chunk_order INTEGER PRIMARY KEY,
    content TEXT NOT NULL,
    embedding BLOB NOT NULL
);
"#;

/// Durable index stored in a SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteIndexStore {
    path: PathBuf,
}

impl SqliteIndexStore {
    /// Create a store for the file at `path`. Nothing is opened until save or load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize embedding to bytes.
    fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
        embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Deserialize embedding from bytes.
    fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    fn write(&self, index: &Index) -> std::result::Result<(), rusqlite::Error> {
        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM chunks", [])?;
        tx.execute("DELETE FROM index_meta", [])?;

        let meta = index.meta();
        let meta_rows = [
            ("format_version", FORMAT_VERSION.to_string()),
            ("embedding_model", meta.embedding_model.clone()),
            ("dimensions", meta.dimensions.to_string()),
            ("built_at", meta.built_at.to_rfc3339()),
            ("chunk_count", index.len().to_string()),
        ];
        for (key, value) in meta_rows {
            tx.execute(
                "INSERT INTO index_meta (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }

        {
            let mut stmt =
                tx.prepare("INSERT INTO chunks (chunk_order, content, embedding) VALUES (?1, ?2, ?3)")?;
            for entry in index.entries() {
                stmt.execute(params![
                    entry.order as i64,
                    entry.text,
                    Self::embedding_to_bytes(&entry.embedding),
                ])?;
            }
        }

        tx.commit()
    }

    fn read(&self) -> Result<Index> {
        let corrupt = |e: rusqlite::Error| {
            QaragError::IndexLoad(format!("{}: {}", self.path.display(), e))
        };

        let conn = Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(corrupt)?;

        let mut meta: HashMap<String, String> = HashMap::new();
        {
            let mut stmt = conn
                .prepare("SELECT key, value FROM index_meta")
                .map_err(corrupt)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(corrupt)?;
            for row in rows {
                let (key, value) = row.map_err(corrupt)?;
                meta.insert(key, value);
            }
        }

        let field = |key: &str| {
            meta.get(key).cloned().ok_or_else(|| {
                QaragError::IndexLoad(format!(
                    "{}: missing '{}' metadata",
                    self.path.display(),
                    key
                ))
            })
        };

        let version = field("format_version")?;
        if version != FORMAT_VERSION {
            return Err(QaragError::IndexLoad(format!(
                "{}: unsupported index format version {}",
                self.path.display(),
                version
            )));
        }

        let dimensions: usize = field("dimensions")?.parse().map_err(|_| {
            QaragError::IndexLoad(format!("{}: invalid dimensions", self.path.display()))
        })?;
        let chunk_count: usize = field("chunk_count")?.parse().map_err(|_| {
            QaragError::IndexLoad(format!("{}: invalid chunk count", self.path.display()))
        })?;
        let built_at = DateTime::parse_from_rfc3339(&field("built_at")?)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                QaragError::IndexLoad(format!("{}: invalid build time: {}", self.path.display(), e))
            })?;

        let meta = IndexMeta {
            embedding_model: field("embedding_model")?,
            dimensions,
            built_at,
        };

        let mut entries = Vec::with_capacity(chunk_count);
        {
            let mut stmt = conn
                .prepare("SELECT chunk_order, content, embedding FROM chunks ORDER BY chunk_order")
                .map_err(corrupt)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Vec<u8>>(2)?,
                    ))
                })
                .map_err(corrupt)?;

            for row in rows {
                let (order, text, bytes) = row.map_err(corrupt)?;
                let embedding = Self::bytes_to_embedding(&bytes).ok_or_else(|| {
                    QaragError::IndexLoad(format!(
                        "{}: chunk {} has a truncated embedding",
                        self.path.display(),
                        order
                    ))
                })?;
                let order = usize::try_from(order).map_err(|_| {
                    QaragError::IndexLoad(format!(
                        "{}: negative chunk order {}",
                        self.path.display(),
                        order
                    ))
                })?;
                entries.push(IndexedChunk {
                    order,
                    text,
                    embedding,
                });
            }
        }

        if entries.len() != chunk_count {
            return Err(QaragError::IndexLoad(format!(
                "{}: metadata lists {} chunks, found {}",
                self.path.display(),
                chunk_count,
                entries.len()
            )));
        }

        let index = Index::new(meta, entries);
        index
            .validate()
            .map_err(|e| QaragError::IndexLoad(format!("{}: {}", self.path.display(), e)))?;
        Ok(index)
    }
}

impl IndexStore for SqliteIndexStore {
    #[instrument(skip_all, fields(path = %self.path.display(), chunks = index.len()))]
    fn save(&self, index: &Index) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    QaragError::IndexBuild(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        self.write(index)
            .map_err(|e| QaragError::IndexBuild(format!("{}: {}", self.path.display(), e)))?;

        info!("Wrote index with {} chunks to {:?}", index.len(), self.path);
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Index> {
        if !self.path.is_file() {
            return Err(QaragError::IndexLoad(format!(
                "no index at {}. Run 'qarag ingest' first.",
                self.path.display()
            )));
        }

        let index = self.read()?;
        debug!("Loaded {} chunks from {:?}", index.len(), self.path);
        Ok(index)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_store::sample_index;

    #[test]
    fn test_round_trip_preserves_text_and_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteIndexStore::new(dir.path().join("sub").join("index.db"));

        let index = sample_index(&[
            ("Q: What color?\nA: Blue.", vec![0.25, -1.5, 3.0]),
            ("Q: How many?\nA: Three. ünïcode ✓", vec![1.0, 0.0, f32::MIN_POSITIVE]),
        ]);
        store.save(&index).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.entries(), index.entries());
        assert_eq!(loaded.meta().embedding_model, "test-model");
        assert_eq!(loaded.meta().dimensions, 3);
    }

    #[test]
    fn test_save_replaces_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteIndexStore::new(dir.path().join("index.db"));

        store
            .save(&sample_index(&[("a", vec![1.0]), ("b", vec![2.0]), ("c", vec![3.0])]))
            .unwrap();
        store.save(&sample_index(&[("only", vec![1.0, 1.0])])).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.entries()[0].text, "only");
        assert_eq!(loaded.meta().dimensions, 2);
    }

    #[test]
    fn test_empty_index_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteIndexStore::new(dir.path().join("index.db"));
        store.save(&sample_index(&[])).unwrap();

        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteIndexStore::new(dir.path().join("absent.db"));
        assert!(matches!(store.load(), Err(QaragError::IndexLoad(_))));
    }

    #[test]
    fn test_garbage_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        std::fs::write(&path, b"this is not a sqlite database, just some bytes on disk").unwrap();

        let store = SqliteIndexStore::new(&path);
        assert!(matches!(store.load(), Err(QaragError::IndexLoad(_))));
    }

    #[test]
    fn test_truncated_embedding_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.db");
        let store = SqliteIndexStore::new(&path);
        store.save(&sample_index(&[("a", vec![1.0, 2.0])])).unwrap();

        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE chunks SET embedding = ?1", params![vec![0u8; 6]])
            .unwrap();
        drop(conn);

        assert!(matches!(store.load(), Err(QaragError::IndexLoad(_))));
    }

    #[test]
    fn test_embedding_bytes() {
        let bytes = SqliteIndexStore::embedding_to_bytes(&[1.0, -2.5]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(SqliteIndexStore::bytes_to_embedding(&bytes), Some(vec![1.0, -2.5]));
        assert_eq!(SqliteIndexStore::bytes_to_embedding(&bytes[..5]), None);
    }
}
