//! SQLite-backed key-value store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, ErrorCode, OptionalExtension};
use tracing::{debug, info};

use crate::backend::RecordStore;
use crate::error::{Error, Result};
use crate::schema;

/// Durable backend keeping every key in a single `kv` table.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Cap the database size in pages. Writes that need more space fail
    /// with [`Error::StorageQuotaExceeded`].
    ///
    /// SQLite never shrinks the cap below the current page count; the
    /// effective value is returned.
    pub fn set_max_page_count(&self, pages: u32) -> Result<u32> {
        let conn = self.lock()?;
        let effective: i64 =
            conn.pragma_update_and_check(None, "max_page_count", pages, |row| row.get(0))?;
        debug!("max_page_count set to {}", effective);
        Ok(u32::try_from(effective).unwrap_or(u32::MAX))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            Error::StorageUnavailable("database connection lock poisoned".to_string())
        })
    }
}

/// Translate SQLite failures into the storage taxonomy.
fn storage_error(e: rusqlite::Error) -> Error {
    match e.sqlite_error_code() {
        Some(ErrorCode::DiskFull) => Error::StorageQuotaExceeded(e.to_string()),
        _ => Error::StorageUnavailable(e.to_string()),
    }
}

impl RecordStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        conn.query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )
        .map_err(storage_error)?;
        debug!("sqlite set {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?", [key])
            .map_err(storage_error)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .map_err(storage_error)?;
        let keys = stmt
            .query_map([], |row| row.get(0))
            .map_err(storage_error)?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(storage_error)?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_is_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }

    #[test]
    fn test_set_overwrites() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("health-tracker-goals", r#"{"waterGoal":8}"#).unwrap();
        store.set("health-tracker-goals", r#"{"waterGoal":9}"#).unwrap();

        assert_eq!(
            store.get("health-tracker-goals").unwrap(),
            Some(r#"{"waterGoal":9}"#.to_string())
        );
        assert_eq!(store.keys().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_missing_key_is_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.remove("nothing-here").unwrap();
        assert_eq!(store.get("nothing-here").unwrap(), None);
    }

    #[test]
    fn test_page_cap_maps_to_quota_exceeded() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("capped.db")).unwrap();
        store.set_max_page_count(1).unwrap();

        let big = "x".repeat(256 * 1024);
        let err = store.set("health-tracker-2026-10-18", &big).unwrap_err();
        assert!(matches!(err, Error::StorageQuotaExceeded(_)), "got {err:?}");
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        let store = SqliteStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap(), Some("v".to_string()));
    }
}
