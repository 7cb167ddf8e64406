//! Key-value backends.
//!
//! The [`RecordStore`] trait is the whole capability set the record logic
//! needs: string keys to string values with `get`, `set`, `remove` and
//! `keys`. [`MemoryStore`] keeps everything in process and can simulate a
//! full or unreachable backend; the durable backend is
//! [`SqliteStore`](crate::SqliteStore).

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{Error, Result};

/// String-keyed persistent storage.
///
/// Implementations must make each call atomic on its own: a `set` either
/// stores the whole value or nothing.
pub trait RecordStore: Send + Sync {
    /// Fetch the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// List every key currently stored.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}

/// In-process backend.
///
/// Useful for tests and for sessions that should not touch disk.
///
/// # Example
///
/// ```
/// use hydra_store::{MemoryStore, RecordStore};
///
/// let store = MemoryStore::with_quota(16);
/// store.set("a", "1").unwrap();
/// assert!(store.set("health-tracker-goals", "{}").is_err());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: None,
            available: AtomicBool::new(true),
        }
    }

    /// Create an empty store that holds at most `bytes` of keys plus values.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Make every subsequent operation fail with `StorageUnavailable`
    /// (`false`) or succeed again (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes used by keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|e| used_bytes(&e))
            .unwrap_or(0)
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::StorageUnavailable(
                "memory store is offline".to_string(),
            ))
        }
    }
}

fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn poisoned() -> Error {
    Error::StorageUnavailable("memory store lock poisoned".to_string())
}

impl RecordStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        if let Some(quota) = self.quota {
            let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
            let needed = used_bytes(&entries) - replaced + key.len() + value.len();
            if needed > quota {
                return Err(Error::StorageQuotaExceeded(format!(
                    "writing {} would use {} of {} bytes",
                    key, needed, quota
                )));
            }
        }

        debug!("memory set {} ({} bytes)", key, value.len());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let store = MemoryStore::with_quota(10);
        store.set("key", "12345").unwrap(); // 8 bytes
        // Replacing the value frees the old bytes first
        store.set("key", "1234567").unwrap(); // 10 bytes
        assert_eq!(store.used_bytes(), 10);

        let err = store.set("x", "y").unwrap_err();
        assert!(matches!(err, Error::StorageQuotaExceeded(_)));
        assert_eq!(store.get("key").unwrap(), Some("1234567".to_string()));
    }

    #[test]
    fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.set_available(false);

        assert!(matches!(store.get("k"), Err(Error::StorageUnavailable(_))));
        assert!(matches!(store.set("k", "w"), Err(Error::StorageUnavailable(_))));
        assert!(matches!(store.remove("k"), Err(Error::StorageUnavailable(_))));
        assert!(matches!(store.keys(), Err(Error::StorageUnavailable(_))));

        store.set_available(true);
        assert_eq!(store.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_shared_store_through_arc() {
        let store = Arc::new(MemoryStore::new());
        let shared: Arc<MemoryStore> = Arc::clone(&store);
        shared.set("k", "v").unwrap();
        assert_eq!(RecordStore::get(&store, "k").unwrap(), Some("v".to_string()));
    }
}
