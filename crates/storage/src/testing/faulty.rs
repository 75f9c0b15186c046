//! Storage port with injectable failures

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use roster_core::{Error, Result, StoragePort};

use crate::memory::MemoryStore;

/// A [`MemoryStore`] that can be told to fail
///
/// - `fail_writes_to(key)`: every `set`/`remove` on `key` fails
/// - `fail_writes_after(n)`: the next `n` writes succeed, later ones fail
/// - `fail_reads(true)`: every `get`/`keys` fails
///
/// Failures surface as `Error::StorageError`.
#[derive(Debug)]
pub struct FaultyStore {
    inner: MemoryStore,
    failing_keys: Mutex<HashSet<String>>,
    writes_left: Mutex<Option<usize>>,
    reads_fail: AtomicBool,
    writes: AtomicUsize,
}

impl FaultyStore {
    /// Create a store that does not fail yet (no quota)
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::unlimited(),
            failing_keys: Mutex::new(HashSet::new()),
            writes_left: Mutex::new(None),
            reads_fail: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Backing store, for planting data without going through fault checks
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Make every write to `key` fail
    pub fn fail_writes_to(&self, key: &str) {
        self.failing_keys.lock().insert(key.to_string());
    }

    /// Let `n` more writes succeed, then fail the rest
    pub fn fail_writes_after(&self, n: usize) {
        *self.writes_left.lock() = Some(n);
    }

    /// Toggle read failures
    pub fn fail_reads(&self, fail: bool) {
        self.reads_fail.store(fail, Ordering::SeqCst);
    }

    /// Clear every injected failure
    pub fn heal(&self) {
        self.failing_keys.lock().clear();
        *self.writes_left.lock() = None;
        self.reads_fail.store(false, Ordering::SeqCst);
    }

    /// Number of writes that reached the backing store
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn admit_write(&self, key: &str) -> Result<()> {
        if self.failing_keys.lock().contains(key) {
            return Err(Error::StorageError(format!("injected write failure on '{}'", key)));
        }
        let mut left = self.writes_left.lock();
        match left.as_mut() {
            Some(0) => {
                return Err(Error::StorageError(format!(
                    "injected write failure on '{}' (write budget exhausted)",
                    key
                )))
            }
            Some(n) => *n -= 1,
            None => {}
        }
        Ok(())
    }

    fn admit_read(&self) -> Result<()> {
        if self.reads_fail.load(Ordering::SeqCst) {
            Err(Error::StorageError("injected read failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for FaultyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoragePort for FaultyStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.admit_read()?;
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.admit_write(key)?;
        self.inner.set(key, value)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.admit_write(key)?;
        self.inner.remove(key)?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        self.admit_read()?;
        self.inner.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_writes_to_key() {
        let store = FaultyStore::new();
        store.fail_writes_to("meals");
        assert!(store.set("meals", "[]").is_err());
        assert!(store.set("students", "[]").is_ok());
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_fail_writes_after_budget() {
        let store = FaultyStore::new();
        store.fail_writes_after(2);
        assert!(store.set("a", "1").is_ok());
        assert!(store.set("b", "2").is_ok());
        assert!(store.set("c", "3").is_err());
        assert!(store.remove("a").is_err());

        store.heal();
        assert!(store.set("c", "3").is_ok());
    }

    #[test]
    fn test_fail_reads() {
        let store = FaultyStore::new();
        store.set("a", "1").unwrap();
        store.fail_reads(true);
        assert!(store.get("a").is_err());
        assert!(store.keys().is_err());
        store.fail_reads(false);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
