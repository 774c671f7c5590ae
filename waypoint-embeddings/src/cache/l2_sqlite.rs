//! L2 SQLite-backed embedding cache.
//!
//! Persists `key → little-endian f32 blob` rows, so vectors survive process
//! restarts. The connection sits behind a mutex; rusqlite connections are
//! `Send` but not `Sync`.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};
use waypoint_core::errors::EmbeddingError;

pub struct L2SqliteCache {
    conn: Mutex<Connection>,
}

impl L2SqliteCache {
    /// Open or create the cache database at `path`.
    pub fn open(path: &Path) -> Result<Self, EmbeddingError> {
        let conn = Connection::open(path).map_err(cache_err)?;
        Self::init(conn)
    }

    /// A cache that lives only as long as the process. Used in tests.
    pub fn in_memory() -> Result<Self, EmbeddingError> {
        let conn = Connection::open_in_memory().map_err(cache_err)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, EmbeddingError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS embedding_cache (
                content_hash TEXT PRIMARY KEY,
                embedding    BLOB NOT NULL,
                created_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .map_err(cache_err)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Look up an embedding. Read errors count as a miss.
    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        let conn = self.conn.lock().ok()?;
        let blob: Option<Vec<u8>> = conn
            .query_row(
                "SELECT embedding FROM embedding_cache WHERE content_hash = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|e| {
                warn!(error = %e, "L2 cache read failed");
                None
            });
        blob.map(|bytes| bytes_to_f32(&bytes))
    }

    /// Store an embedding, replacing any previous value.
    pub fn insert(&self, key: &str, embedding: &[f32]) {
        let bytes: Vec<u8> = embedding.iter().flat_map(|f| f.to_le_bytes()).collect();
        let Ok(conn) = self.conn.lock() else {
            warn!("L2 cache lock poisoned, skipping insert");
            return;
        };
        match conn.execute(
            "INSERT OR REPLACE INTO embedding_cache (content_hash, embedding) VALUES (?1, ?2)",
            params![key, bytes],
        ) {
            Ok(_) => debug!(key, "L2 cache insert"),
            Err(e) => warn!(error = %e, "L2 cache write failed"),
        }
    }

    pub fn len(&self) -> usize {
        let Ok(conn) = self.conn.lock() else {
            return 0;
        };
        conn.query_row("SELECT COUNT(*) FROM embedding_cache", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n.max(0) as usize)
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trailing bytes that do not form a full f32 are dropped.
fn bytes_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn cache_err(e: rusqlite::Error) -> EmbeddingError {
    EmbeddingError::CacheError {
        reason: e.to_string(),
    }
}
