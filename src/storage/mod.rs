use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;

/// Slot holding the interface language code
pub const LANGUAGE_KEY: &str = "language";
/// Slot holding the JSON-serialized favorites collection
pub const FAVORITES_KEY: &str = "favorites";

/// Get the state database path (~/.config/sinema/state.db)
pub fn db_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sinema")
        .join("state.db")
}

/// String-keyed persistent slots. A failed write is logged and otherwise ignored.
pub trait Storage {
    /// Read a slot, `None` if it was never written or cannot be read
    fn load(&self, key: &str) -> Option<String>;

    /// Write a slot
    fn save(&self, key: &str, value: &str);
}

/// SQLite-backed storage, one row per key
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open or create the database at `path`
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Open(e.to_string()))?;
        }

        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_schema()?;

        Ok(storage)
    }

    /// Storage that lives only as long as the process
    #[allow(dead_code)]
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_schema()?;
        Ok(storage)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;
        Ok(())
    }

    fn try_load(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    fn try_save(&self, key: &str, value: &str) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn load(&self, key: &str) -> Option<String> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read slot '{}': {}", key, e);
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(e) = self.try_save(key, value) {
            tracing::warn!("Failed to write slot '{}': {}", key, e);
        }
    }
}

/// In-process storage, used for `--ephemeral` runs and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot
    pub fn with(self, key: &str, value: &str) -> Self {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl<S: Storage + ?Sized> Storage for std::rc::Rc<S> {
    fn load(&self, key: &str) -> Option<String> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) {
        (**self).save(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_path() {
        assert!(db_path().ends_with("sinema/state.db"));
    }

    #[test]
    fn test_sqlite_missing_key() {
        let storage = SqliteStorage::in_memory().unwrap();
        assert_eq!(storage.load(LANGUAGE_KEY), None);
    }

    #[test]
    fn test_sqlite_save_overwrites() {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.save(LANGUAGE_KEY, "ar");
        storage.save(LANGUAGE_KEY, "en");
        assert_eq!(storage.load(LANGUAGE_KEY).as_deref(), Some("en"));
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.save(FAVORITES_KEY, r#"{"movies":[],"tv":[]}"#);
        }

        let reopened = SqliteStorage::open(&path).unwrap();
        assert_eq!(
            reopened.load(FAVORITES_KEY).as_deref(),
            Some(r#"{"movies":[],"tv":[]}"#)
        );
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new().with(LANGUAGE_KEY, "en");
        assert_eq!(storage.load(LANGUAGE_KEY).as_deref(), Some("en"));
        storage.save(LANGUAGE_KEY, "ar");
        assert_eq!(storage.load(LANGUAGE_KEY).as_deref(), Some("ar"));
        assert_eq!(storage.load(FAVORITES_KEY), None);
    }
}
