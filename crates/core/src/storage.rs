//! Persisted client state
//!
//! The client keeps a handful of serialized objects (most importantly the
//! session under the `user` key) between runs, the way a browser keeps them
//! in local storage. Each value is overwritten wholesale on every change.
//!
//! [`FileStore`] writes `<dir>/<key>.json` next to a SHA-256 sidecar,
//! readable by the owner only. An entry whose contents no longer match its
//! sidecar is deleted and reported as corrupted. [`MemoryStore`] keeps
//! everything in process.
//!
//! # Example
//!
//! ```rust,ignore
//! use homecook_core::storage::{KeyValueStoreExt, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("user", &serde_json::json!({ "id": 7 }))?;
//! let user: Option<serde_json::Value> = store.get("user")?;
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

/// Raw byte-level key/value storage
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace whatever is stored under `key`
    fn write(&self, key: &str, data: &[u8]) -> Result<()>;

    /// Remove `key`, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool>;
}

/// Typed JSON access on top of any [`KeyValueStore`]
pub trait KeyValueStoreExt {
    /// Read and deserialize the value stored under `key`
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Serialize `value` and store it under `key`
    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read(key)? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.write(key, &data)
    }
}

/// File-backed store
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`, creating it if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory holding the stored files
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn data_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn hash_path(&self, key: &str) -> Result<PathBuf> {
        check_key(key)?;
        Ok(self.dir.join(format!("{key}.sha256")))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let data_path = self.data_path(key)?;
        let hash_path = self.hash_path(key)?;

        if !data_path.exists() {
            return Ok(None);
        }

        let data = fs::read(&data_path)?;
        let expected = fs::read_to_string(&hash_path).unwrap_or_default();

        if expected.trim() != hash_data(&data) {
            warn!(key, path = %data_path.display(), "Stored value failed integrity check, discarding");
            let _ = fs::remove_file(&data_path);
            let _ = fs::remove_file(&hash_path);
            return Err(Error::storage_corrupted(key)
                .with_context(format!("Reading {}", data_path.display())));
        }

        Ok(Some(data))
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let data_path = self.data_path(key)?;
        let hash_path = self.hash_path(key)?;

        write_private(&data_path, data)?;
        write_private(&hash_path, hash_data(data).as_bytes())?;
        debug!(key, bytes = data.len(), "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let data_path = self.data_path(key)?;
        let hash_path = self.hash_path(key)?;

        let existed = data_path.exists();
        let _ = fs::remove_file(&data_path);
        let _ = fs::remove_file(&hash_path);
        Ok(existed)
    }
}

/// In-process store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let guard = self.entries.read().map_err(|_| lock_error())?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, data: &[u8]) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        guard.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        Ok(guard.remove(key).is_some())
    }
}

fn lock_error() -> Error {
    Error::new(ErrorCode::Internal, "Failed to acquire storage lock")
}

fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(Error::new(ErrorCode::InvalidInput, format!("Invalid storage key: {key:?}")))
    }
}

/// Replace `path` with `data`, leaving it readable by the owner only
fn write_private(path: &Path, data: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // Files left by older versions keep their mode on open
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(data)?;
    Ok(())
}

fn hash_data(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
