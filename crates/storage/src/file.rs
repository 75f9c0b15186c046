//! FileStore: directory-backed string store
//!
//! Each key is one `<key>.json` file in the data directory. Writes go to a
//! hidden temp file that is then renamed over the target, so a crash mid-write
//! leaves either the old or the new value, never a torn one.
//!
//! Two processes sharing a directory are not coordinated: the last rename
//! wins.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use roster_core::{Error, Result, StoragePort};

const VALUE_EXTENSION: &str = ".json";

/// File-per-key storage backend
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<usize>,
    sync: bool,
    /// Serializes writers within this process so quota checks see a stable directory
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`
    ///
    /// Defaults: no quota, no fsync.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            quota: None,
            sync: false,
            write_lock: Mutex::new(()),
        })
    }

    /// Limit the total size of stored values (`None` = unlimited)
    pub fn with_quota(mut self, quota: Option<usize>) -> Self {
        self.quota = quota;
        self
    }

    /// fsync every value file before it is renamed into place
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Data directory
    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Check that `key` maps to a plain file name
    ///
    /// Accepts non-empty keys made of ASCII letters, digits, `_` and `-`.
    pub fn validate_key(key: &str) -> Result<()> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidKey(format!(
                "'{}' (allowed: ASCII letters, digits, '_' and '-')",
                key
            )))
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        Ok(self.dir.join(format!("{}{}", key, VALUE_EXTENSION)))
    }

    /// Write `value` to `tmp`, then rename it over `path`
    fn replace_with(&self, tmp: &Path, path: &Path, value: &str) -> io::Result<()> {
        let mut file = fs::File::create(tmp)?;
        file.write_all(value.as_bytes())?;
        if self.sync {
            file.sync_all()?;
        }
        drop(file);
        fs::rename(tmp, path)
    }

    /// Total size of every value file except `key`'s
    fn usage_excluding(&self, key: &str) -> Result<usize> {
        let mut total = 0usize;
        for stored in self.keys()? {
            if stored == key {
                continue;
            }
            let meta = fs::metadata(self.path_for(&stored)?)?;
            total += meta.len() as usize;
        }
        Ok(total)
    }
}

impl StoragePort for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();

        if let Some(limit) = self.quota {
            let requested = self.usage_excluding(key)? + value.len();
            if requested > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    limit,
                });
            }
        }

        let tmp = self.dir.join(format!(".{}{}.tmp", key, VALUE_EXTENSION));
        if let Err(e) = self.replace_with(&tmp, &path, value) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "cannot remove temp file");
                }
            }
            return Err(e.into());
        }
        debug!(key = %key, bytes = value.len(), "wrote value file");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(key) = name.strip_suffix(VALUE_EXTENSION) {
                if Self::validate_key(key).is_ok() {
                    keys.push(key.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
