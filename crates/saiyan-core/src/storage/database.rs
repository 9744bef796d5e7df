//! SQLite-backed key-value store.
//!
//! The whole session state is a handful of JSON blobs, so storage is a
//! single kv table in `~/.config/saiyan-tracker/tracker.db`.

use rusqlite::{params, Connection};

use super::{data_dir, StateStore};
use crate::error::StorageError;

/// SQLite database holding the persisted session blobs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data-dir>/tracker.db`, creating the file and
    /// schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("tracker.db");
        let conn = Connection::open(&path)
            .map_err(|source| StorageError::OpenFailed { path, source })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a raw value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a raw value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl StateStore for Database {
    fn load(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
        match self.kv_get(key)? {
            Some(raw) => {
                let value = serde_json::from_str(&raw)
                    .map_err(|e| StorageError::QueryFailed(format!("corrupt value for {key}: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
        self.kv_set(key, &value.to_string())
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}
