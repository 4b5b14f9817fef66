//! Blob persistence contract with in-memory and SQLite implementations.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure reading, writing or encoding the persisted blob.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    Encode(serde_json::Error),
    /// Adapter-specific failure with a diagnostic message.
    Backend(String),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode club data: {err}"),
            Self::Backend(message) => write!(f, "persistence backend failure: {message}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Opaque key-value storage for one serialized blob per key.
pub trait PersistenceAdapter {
    fn load_blob(&self, key: &str) -> PersistenceResult<Option<String>>;
    fn save_blob(&self, key: &str, blob: &str) -> PersistenceResult<()>;
}

impl<P: PersistenceAdapter + ?Sized> PersistenceAdapter for &P {
    fn load_blob(&self, key: &str) -> PersistenceResult<Option<String>> {
        (**self).load_blob(key)
    }

    fn save_blob(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        (**self).save_blob(key, blob)
    }
}

/// Process-local adapter backed by a map.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    blobs: RefCell<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an adapter pre-seeded with one blob.
    pub fn with_blob(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let adapter = Self::new();
        adapter.blobs.borrow_mut().insert(key.into(), blob.into());
        adapter
    }

    /// Returns a copy of the stored blob for `key`.
    pub fn blob(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl PersistenceAdapter for MemoryPersistence {
    fn load_blob(&self, key: &str) -> PersistenceResult<Option<String>> {
        Ok(self.blob(key))
    }

    fn save_blob(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// SQLite-backed adapter storing blobs in the `kv_store` table.
///
/// The connection must come from `db::open_db*` so migrations are applied.
pub struct SqlitePersistence<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePersistence<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl PersistenceAdapter for SqlitePersistence<'_> {
    fn load_blob(&self, key: &str) -> PersistenceResult<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn save_blob(&self, key: &str, blob: &str) -> PersistenceResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, blob],
        )?;
        Ok(())
    }
}
