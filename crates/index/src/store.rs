//! SQLite-backed vector store with named collections.
//!
//! Embeddings are stored as little-endian `f32` BLOBs and searched by brute
//! force cosine similarity. A collection fixes its dimension on first insert.

use crate::types::{ChunkMetadata, CollectionInfo, EmbeddingRecord, ScoredChunk};
use archimind_core::{AppError, AppResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// File name of the store inside the store directory.
pub const STORE_FILE: &str = "index.sqlite";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS collections (
        name TEXT PRIMARY KEY,
        dimension INTEGER NOT NULL,
        created_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS records (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        collection TEXT NOT NULL,
        source TEXT NOT NULL,
        text TEXT NOT NULL,
        embedding BLOB NOT NULL,
        metadata TEXT NOT NULL,
        FOREIGN KEY (collection) REFERENCES collections(name)
    );

    CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);
"#;

/// Normalize a collection name: `-`, `.` and `/` become `_`.
pub fn sanitize_collection_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '.' | '/' => '_',
            other => other,
        })
        .collect()
}

/// Persistent vector store.
pub struct VectorStore {
    conn: Connection,
}

impl VectorStore {
    /// Open (or create) a store at `db_path`, creating parent directories.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Index(format!("Failed to create store directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Index(format!("Failed to open vector store: {}", e)))?;
        Self::init(conn, db_path)
    }

    /// Open the store inside `store_dir` using the default file name.
    pub fn open_in(store_dir: &Path) -> AppResult<Self> {
        Self::open(&store_dir.join(STORE_FILE))
    }

    /// Open a throwaway in-memory store.
    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::Index(format!("Failed to open vector store: {}", e)))?;
        Self::init(conn, Path::new(":memory:"))
    }

    fn init(conn: Connection, db_path: &Path) -> AppResult<Self> {
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::Index(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Opened vector store at {:?}", db_path);
        Ok(Self { conn })
    }

    /// Append records to `collection` in a single transaction.
    ///
    /// The collection is created on first insert with the dimension of the
    /// first record. Returns the number of records written.
    ///
    /// # Errors
    /// Returns `AppError::Index` if any record's dimension differs from the
    /// collection's; nothing is written in that case.
    pub fn add(&mut self, collection: &str, records: &[EmbeddingRecord]) -> AppResult<usize> {
        let Some(first) = records.first() else {
            return Ok(0);
        };
        let collection = sanitize_collection_name(collection);

        let dimension = match self.dimension(&collection)? {
            Some(dim) => dim,
            None => first.embedding.len(),
        };

        if let Some(bad) = records.iter().find(|r| r.embedding.len() != dimension) {
            return Err(AppError::Index(format!(
                "Embedding dimension mismatch for collection '{}': expected {}, got {}",
                collection,
                dimension,
                bad.embedding.len()
            )));
        }

        let tx = self
            .conn
            .transaction()
            .map_err(|e| AppError::Index(format!("Failed to begin transaction: {}", e)))?;

        tx.execute(
            "INSERT OR IGNORE INTO collections (name, dimension, created_at) VALUES (?1, ?2, ?3)",
            params![collection, dimension as i64, Utc::now().to_rfc3339()],
        )
        .map_err(|e| AppError::Index(format!("Failed to create collection: {}", e)))?;

        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO records (id, collection, source, text, embedding, metadata)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .map_err(|e| AppError::Index(format!("Failed to prepare insert: {}", e)))?;

            for record in records {
                let metadata = serde_json::to_string(&record.chunk.metadata)?;
                stmt.execute(params![
                    record.chunk.id,
                    collection,
                    record.chunk.metadata.source,
                    record.chunk.text,
                    embedding_to_bytes(&record.embedding),
                    metadata,
                ])
                .map_err(|e| AppError::Index(format!("Failed to insert record: {}", e)))?;
            }
        }

        tx.commit()
            .map_err(|e| AppError::Index(format!("Failed to commit records: {}", e)))?;

        tracing::debug!("Stored {} records in '{}'", records.len(), collection);
        Ok(records.len())
    }

    /// Return the `k` records most similar to `embedding`, best first.
    ///
    /// Equal scores keep insertion order. A missing collection yields an
    /// empty result.
    pub fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> AppResult<Vec<ScoredChunk>> {
        let collection = sanitize_collection_name(collection);
        if k == 0 {
            return Ok(Vec::new());
        }

        let Some(dimension) = self.dimension(&collection)? else {
            return Ok(Vec::new());
        };

        if embedding.len() != dimension {
            return Err(AppError::Index(format!(
                "Query dimension {} does not match collection '{}' dimension {}",
                embedding.len(),
                collection,
                dimension
            )));
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, text, embedding, metadata FROM records
                 WHERE collection = ?1 ORDER BY seq",
            )
            .map_err(|e| AppError::Index(format!("Failed to prepare query: {}", e)))?;

        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Vec<u8>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| AppError::Index(format!("Failed to query records: {}", e)))?;

        let mut results = Vec::new();
        for row in rows {
            let (id, text, bytes, metadata) =
                row.map_err(|e| AppError::Index(format!("Failed to read record: {}", e)))?;
            let stored = bytes_to_embedding(&bytes)?;
            let metadata: ChunkMetadata = serde_json::from_str(&metadata)?;

            results.push(ScoredChunk {
                id,
                text,
                metadata,
                score: cosine_similarity(embedding, &stored),
            });
        }

        // Stable sort keeps insertion order for ties
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(k);

        tracing::debug!(
            "Retrieved {} chunks from '{}' (requested top-{})",
            results.len(),
            collection,
            k
        );

        Ok(results)
    }

    /// Number of records in `collection` (0 when missing).
    pub fn count(&self, collection: &str) -> AppResult<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE collection = ?1",
                params![sanitize_collection_name(collection)],
                |row| row.get(0),
            )
            .map_err(|e| AppError::Index(format!("Failed to count records: {}", e)))?;
        Ok(count as usize)
    }

    /// Whether `collection` has been created.
    pub fn collection_exists(&self, collection: &str) -> AppResult<bool> {
        Ok(self
            .dimension(&sanitize_collection_name(collection))?
            .is_some())
    }

    /// Describe every collection, sorted by name.
    pub fn list_collections(&self) -> AppResult<Vec<CollectionInfo>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT c.name, c.dimension, c.created_at,
                        COUNT(r.seq), COUNT(DISTINCT r.source)
                 FROM collections c LEFT JOIN records r ON r.collection = c.name
                 GROUP BY c.name ORDER BY c.name",
            )
            .map_err(|e| AppError::Index(format!("Failed to prepare listing: {}", e)))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })
            .map_err(|e| AppError::Index(format!("Failed to list collections: {}", e)))?;

        let mut collections = Vec::new();
        for row in rows {
            let (name, dimension, created_at, chunks, sources) =
                row.map_err(|e| AppError::Index(format!("Failed to read collection: {}", e)))?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| AppError::Index(format!("Invalid collection timestamp: {}", e)))?;

            collections.push(CollectionInfo {
                name,
                dimension: dimension as usize,
                chunks: chunks as usize,
                sources: sources as usize,
                created_at,
            });
        }

        Ok(collections)
    }

    /// Drop `collection` and its records. Returns whether it existed.
    pub fn delete_collection(&mut self, collection: &str) -> AppResult<bool> {
        let collection = sanitize_collection_name(collection);
        let tx = self
            .conn
            .transaction()
            .map_err(|e| AppError::Index(format!("Failed to begin transaction: {}", e)))?;

        tx.execute("DELETE FROM records WHERE collection = ?1", params![collection])
            .map_err(|e| AppError::Index(format!("Failed to delete records: {}", e)))?;
        let removed = tx
            .execute("DELETE FROM collections WHERE name = ?1", params![collection])
            .map_err(|e| AppError::Index(format!("Failed to delete collection: {}", e)))?;

        tx.commit()
            .map_err(|e| AppError::Index(format!("Failed to commit delete: {}", e)))?;

        if removed > 0 {
            tracing::info!("Deleted collection '{}'", collection);
        }
        Ok(removed > 0)
    }

    fn dimension(&self, collection: &str) -> AppResult<Option<usize>> {
        self.conn
            .query_row(
                "SELECT dimension FROM collections WHERE name = ?1",
                params![collection],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map(|dim| dim.map(|d| d as usize))
            .map_err(|e| AppError::Index(format!("Failed to read collection: {}", e)))
    }
}

fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(embedding.len() * 4);
    for &value in embedding {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Index("Invalid embedding bytes length".to_string()));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Cosine similarity; 0.0 for mismatched lengths, zero vectors, or when
/// the computation overflows.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use tempfile::TempDir;

    fn record(source: &str, text: &str, embedding: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            chunk: Chunk {
                id: uuid::Uuid::new_v4().to_string(),
                text: text.to_string(),
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    position: 0,
                    start_byte: 0,
                    end_byte: text.len(),
                    start_line: 1,
                    end_line: 1,
                    content_hash: String::new(),
                },
            },
            embedding,
        }
    }

    #[test]
    fn test_open_creates_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/store").join(STORE_FILE);
        VectorStore::open(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_query_orders_by_similarity() {
        let mut store = VectorStore::in_memory().unwrap();
        store
            .add(
                "practices",
                &[
                    record("a.py", "a", vec![1.0, 0.0]),
                    record("b.py", "b", vec![0.0, 1.0]),
                    record("c.py", "c", vec![0.7, 0.7]),
                ],
            )
            .unwrap();

        let results = store.query("practices", &[1.0, 0.1], 2).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
        assert!(results[0].score >= results[1].score);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut store = VectorStore::in_memory().unwrap();
        store
            .add(
                "dup",
                &[
                    record("first.rs", "first", vec![0.0, 1.0]),
                    record("second.rs", "second", vec![0.0, 1.0]),
                ],
            )
            .unwrap();

        let results = store.query("dup", &[0.0, 1.0], 5).unwrap();
        assert_eq!(results[0].text, "first");
        assert_eq!(results[1].text, "second");
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let store = VectorStore::in_memory().unwrap();
        assert!(store.query("nope", &[1.0], 3).unwrap().is_empty());
        assert_eq!(store.count("nope").unwrap(), 0);
        assert!(!store.collection_exists("nope").unwrap());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut store = VectorStore::in_memory().unwrap();
        store.add("c", &[record("a", "a", vec![1.0, 0.0])]).unwrap();

        let err = store.add("c", &[record("b", "b", vec![1.0, 0.0, 0.0])]).unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
        assert_eq!(store.count("c").unwrap(), 1);

        assert!(store.query("c", &[1.0], 1).is_err());
    }

    #[test]
    fn test_mixed_dimensions_in_one_batch_rejected() {
        let mut store = VectorStore::in_memory().unwrap();
        let result = store.add(
            "c",
            &[record("a", "a", vec![1.0, 0.0]), record("b", "b", vec![1.0])],
        );
        assert!(result.is_err());
        assert!(!store.collection_exists("c").unwrap());
    }

    #[test]
    fn test_collection_names_are_sanitized() {
        let mut store = VectorStore::in_memory().unwrap();
        store
            .add("my-repo.v2/main", &[record("a", "a", vec![1.0])])
            .unwrap();

        assert!(store.collection_exists("my_repo_v2_main").unwrap());
        assert_eq!(store.count("my-repo.v2/main").unwrap(), 1);
    }

    #[test]
    fn test_list_and_delete_collections() {
        let mut store = VectorStore::in_memory().unwrap();
        store
            .add(
                "practices",
                &[
                    record("a.py", "one", vec![1.0, 0.0]),
                    record("a.py", "two", vec![0.0, 1.0]),
                    record("b.py", "three", vec![1.0, 1.0]),
                ],
            )
            .unwrap();
        store
            .add("bad_practices", &[record("x.js", "x", vec![1.0, 0.0, 0.0])])
            .unwrap();

        let collections = store.list_collections().unwrap();
        assert_eq!(collections.len(), 2);
        assert_eq!(collections[0].name, "bad_practices");
        assert_eq!(collections[0].dimension, 3);
        assert_eq!(collections[1].chunks, 3);
        assert_eq!(collections[1].sources, 2);

        assert!(store.delete_collection("practices").unwrap());
        assert!(!store.delete_collection("practices").unwrap());
        assert_eq!(store.list_collections().unwrap().len(), 1);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        {
            let mut store = VectorStore::open_in(temp.path()).unwrap();
            store.add("kb", &[record("a.md", "kept", vec![0.5, 0.5])]).unwrap();
        }

        let store = VectorStore::open_in(temp.path()).unwrap();
        let results = store.query("kb", &[0.5, 0.5], 1).unwrap();
        assert_eq!(results[0].text, "kept");
        assert_eq!(results[0].metadata.source, "a.md");
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 1.0], &[f32::MAX, f32::MAX]), 0.0);
    }

    #[test]
    fn test_overflowing_vectors_score_zero() {
        let mut store = VectorStore::in_memory().unwrap();
        store
            .add(
                "practices",
                &[
                    record("huge.py", "huge", vec![f32::MAX, f32::MAX]),
                    record("far.py", "far", vec![-1.0, 0.0]),
                    record("near.py", "near", vec![0.0, 1.0]),
                ],
            )
            .unwrap();

        let results = store.query("practices", &[1.0, 1.0], 3).unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["near", "huge", "far"]);
        assert!(results.iter().all(|r| r.score.is_finite()));
    }
}
