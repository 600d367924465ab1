//! Storage layer for peerconnect.
//!
//! A persistent string key-value store backed by `SQLite`. It plays the role
//! of browser local storage: values are opaque strings (JSON in practice)
//! addressed by a fixed key, read and written whole.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Persistent key-value store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a key-value store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening key-value store at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        info!("Key-value store opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        debug!(key, found = value.is_some(), "read item");
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the value cannot be written.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn
            .execute(
                r"
                INSERT INTO local_storage (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                ",
                params![key, value, updated_at],
            )
            .map_err(|source| Error::storage_write(key, source))?;
        debug!(key, bytes = value.len(), "wrote item");
        Ok(())
    }

    /// Remove the value stored under `key`.
    ///
    /// Returns `true` if a value was removed, `false` if the key was absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the delete fails.
    pub fn remove_item(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?1", [key])
            .map_err(|source| Error::storage_write(key, source))?;
        Ok(affected > 0)
    }

    /// List all stored keys in lexical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Count stored keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM local_storage", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Remove every stored key.
    ///
    /// Returns the number of keys removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the delete fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM local_storage", [])
            .map_err(|source| Error::storage_write("*", source))?;
        if affected > 0 {
            info!("Cleared {} stored keys", affected);
        }
        Ok(affected)
    }

    /// Get storage statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let total_keys = self.count()?;

        // MAX() yields a single NULL row on an empty table
        let last_write: Option<String> = self.conn.query_row(
            "SELECT MAX(updated_at) FROM local_storage",
            [],
            |row| row.get::<_, Option<String>>(0),
        )?;

        let last_write = last_write
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            total_keys,
            last_write,
            db_size_bytes,
        })
    }

    /// Make every subsequent write fail, to exercise write-failure paths.
    #[cfg(test)]
    pub(crate) fn make_read_only(&self) {
        self.conn
            .execute_batch("PRAGMA query_only = ON;")
            .expect("failed to set query_only");
    }
}

/// Statistics about the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of stored keys.
    pub total_keys: i64,
    /// Time of the most recent write.
    pub last_write: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = create_test_storage();
        assert_eq!(storage.path(), Path::new(":memory:"));
    }

    #[test]
    fn test_get_missing_item() {
        let storage = create_test_storage();
        assert_eq!(storage.get_item("missing").unwrap(), None);
    }

    #[test]
    fn test_set_and_get_item() {
        let storage = create_test_storage();
        storage.set_item("peerconnect_requests", "[2,4]").unwrap();

        assert_eq!(
            storage.get_item("peerconnect_requests").unwrap().as_deref(),
            Some("[2,4]")
        );
    }

    #[test]
    fn test_set_item_overwrites() {
        let storage = create_test_storage();
        storage.set_item("k", "first").unwrap();
        storage.set_item("k", "second").unwrap();

        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("second"));
        assert_eq!(storage.count().unwrap(), 1);
    }

    #[test]
    fn test_remove_item() {
        let storage = create_test_storage();
        storage.set_item("k", "v").unwrap();

        assert!(storage.remove_item("k").unwrap());
        assert!(!storage.remove_item("k").unwrap());
        assert_eq!(storage.get_item("k").unwrap(), None);
    }

    #[test]
    fn test_keys_sorted() {
        let storage = create_test_storage();
        storage.set_item("b", "2").unwrap();
        storage.set_item("a", "1").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let storage = create_test_storage();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        assert_eq!(storage.clear().unwrap(), 2);
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = create_test_storage().stats().unwrap();
        assert_eq!(stats.total_keys, 0);
        assert!(stats.last_write.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_after_write() {
        let storage = create_test_storage();
        storage.set_item("k", "v").unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.total_keys, 1);
        assert!(stats.last_write.is_some());
    }

    #[test]
    fn test_write_failure_is_storage_write() {
        let storage = create_test_storage();
        storage.make_read_only();

        let err = storage.set_item("k", "v").unwrap_err();
        assert!(err.is_storage_write());
        assert!(err.to_string().contains("'k'"));
    }

    #[test]
    fn test_open_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("peerconnect-test-{}", std::process::id()));
        let path = dir.join("nested").join("kv.db");

        let storage = Storage::open(&path).unwrap();
        storage.set_item("k", "v").unwrap();
        drop(storage);

        let reopened = Storage::open(&path).unwrap();
        assert_eq!(reopened.get_item("k").unwrap().as_deref(), Some("v"));
        assert!(reopened.stats().unwrap().db_size_bytes > 0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
