//! MemoryStore: in-process string store with a byte quota
//!
//! Backend for tests and ephemeral rosters:
//! - `BTreeMap<String, String>` for ordered key enumeration
//! - `parking_lot::RwLock` for thread-safe access
//! - A byte quota (key + value bytes) so quota failures can be exercised
//!
//! Nothing survives the process; use [`crate::FileStore`] for that.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use roster_core::{Error, Result, StoragePort};

/// Default quota (5 MiB)
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Default)]
struct Inner {
    entries: BTreeMap<String, String>,
    /// Sum of `key.len() + value.len()` over all entries
    used: usize,
}

/// In-memory storage backend
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    quota: Option<usize>,
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

impl MemoryStore {
    /// Create an empty store with the default quota
    pub fn new() -> Self {
        Self::with_quota(Some(DEFAULT_QUOTA_BYTES))
    }

    /// Create an empty store without a quota
    pub fn unlimited() -> Self {
        Self::with_quota(None)
    }

    /// Create an empty store with an explicit quota (`None` = unlimited)
    pub fn with_quota(quota: Option<usize>) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            quota,
        }
    }

    /// Configured quota in bytes
    pub fn quota(&self) -> Option<usize> {
        self.quota
    }

    /// Bytes currently accounted against the quota
    pub fn usage_bytes(&self) -> usize {
        self.inner.read().used
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut inner = self.inner.write();
        let previous = inner
            .entries
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        let requested = inner.used - previous + entry_size(key, value);

        if let Some(limit) = self.quota {
            if requested > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        inner.entries.insert(key.to_string(), value.to_string());
        inner.used = requested;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut inner = self.inner.write();
        if let Some(old) = inner.entries.remove(key) {
            inner.used -= entry_size(key, &old);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.inner.read().entries.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("students").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("students", "[]").unwrap();
        assert_eq!(store.get("students").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_overwrite_accounts_usage_once() {
        let store = MemoryStore::unlimited();
        store.set("k", "aaaa").unwrap();
        store.set("k", "bb").unwrap();
        assert_eq!(store.usage_bytes(), 1 + 2);
    }

    #[test]
    fn test_remove_releases_usage() {
        let store = MemoryStore::new();
        store.set("meals", "[1,2,3]").unwrap();
        store.remove("meals").unwrap();
        assert_eq!(store.usage_bytes(), 0);
        assert!(store.is_empty());
        // Removing again is fine
        store.remove("meals").unwrap();
    }

    #[test]
    fn test_quota_exceeded_leaves_previous_value() {
        let store = MemoryStore::with_quota(Some(10));
        store.set("k", "12345").unwrap();

        let err = store.set("k", "1234567890").unwrap_err();
        match err {
            Error::QuotaExceeded {
                key,
                requested,
                limit,
            } => {
                assert_eq!(key, "k");
                assert_eq!(requested, 11);
                assert_eq!(limit, 10);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }
        assert_eq!(store.get("k").unwrap().as_deref(), Some("12345"));
    }

    #[test]
    fn test_quota_counts_replacement_not_addition() {
        let store = MemoryStore::with_quota(Some(10));
        store.set("k", "123456789").unwrap();
        // Same size replacement fits even though 2x would not
        store.set("k", "987654321").unwrap();
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.set("supplements", "[]").unwrap();
        store.set("exercises", "[]").unwrap();
        store.set("meals", "[]").unwrap();
        assert_eq!(
            store.keys().unwrap(),
            vec!["exercises", "meals", "supplements"]
        );
    }

    #[test]
    fn test_memory_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }
}
