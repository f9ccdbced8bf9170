//! Durable key/value storage for client state.
//!
//! One JSON document on disk holds every key. The cart and wishlist
//! slices live together under `persist:root`; other keys (pending order,
//! saved customer info) sit beside it. Every write holds an exclusive lock
//! on a sidecar file, re-reads the document, applies its one key and
//! rewrites the document through a temp file. Handles opened separately on
//! the same path therefore never drop each other's keys.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::state::cart::CartState;
use crate::state::wishlist::WishlistState;

const PERSIST_ROOT: &str = "persist:root";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write store file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Whitelisted slices that survive restarts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PersistedSlices {
    #[serde(default)]
    pub cart: CartState,
    #[serde(default)]
    pub wishlist: WishlistState,
}

/// File-backed store. Clones share the same in-memory view.
#[derive(Clone)]
pub struct LocalStore {
    path: PathBuf,
    entries: Arc<Mutex<Map<String, Value>>>,
}

impl LocalStore {
    /// Open the store, reading the existing document if any.
    ///
    /// A missing file starts empty. An unreadable or corrupt file is
    /// logged and also starts empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt local store");
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read local store");
                Map::new()
            }
        };

        Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode a value. Undecodable values read as `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.lock().get(key).cloned()?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value has unexpected shape");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let value = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        self.write_key(key, Some(value))?;
        Ok(())
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.write_key(key, None)?.is_some())
    }

    /// Read a value and remove it in one step. The value read is the one
    /// removed from disk, even if another handle wrote it.
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let Some(value) = self.write_key(key, None)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Stored value has unexpected shape");
                Ok(None)
            }
        }
    }

    /// Load the cart and wishlist, repairing any out-of-range quantities.
    pub fn rehydrate(&self) -> PersistedSlices {
        let slices: PersistedSlices = self.get(PERSIST_ROOT).unwrap_or_default();
        PersistedSlices {
            cart: CartState::from_items(slices.cart.items),
            wishlist: WishlistState::from_items(slices.wishlist.items),
        }
    }

    pub fn persist(&self, cart: &CartState, wishlist: &WishlistState) -> Result<(), StoreError> {
        let slices = PersistedSlices {
            cart: cart.clone(),
            wishlist: wishlist.clone(),
        };
        self.set(PERSIST_ROOT, &slices)
    }

    /// Set or remove one key against the latest on-disk document and
    /// return its previous value. The in-memory view is refreshed from
    /// what was written.
    fn write_key(&self, key: &str, value: Option<Value>) -> Result<Option<Value>, StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut entries = self.entries.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path.with_extension("lock"))
            .map_err(io_err)?;
        lock.lock_exclusive().map_err(io_err)?;

        let result = self.merge_and_write(&entries, key, value);

        if let Err(e) = FileExt::unlock(&lock) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to release local store lock");
        }
        let (document, previous) = result?;

        tracing::debug!(path = %self.path.display(), key, keys = document.len(), "Local store flushed");
        *entries = document;
        Ok(previous)
    }

    /// Runs with the file lock held.
    fn merge_and_write(
        &self,
        cached: &Map<String, Value>,
        key: &str,
        value: Option<Value>,
    ) -> Result<(Map<String, Value>, Option<Value>), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        let mut document = match fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "Replacing corrupt local store");
                    cached.clone()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(io_err(e)),
        };

        let (previous, changed) = match value {
            Some(value) => (document.insert(key.to_string(), value), true),
            None => {
                let previous = document.remove(key);
                let changed = previous.is_some();
                (previous, changed)
            }
        };
        if !changed {
            return Ok((document, None));
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(&document).map_err(|source| StoreError::Serialize {
            key: key.to_string(),
            source,
        })?;
        File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&body)?;
                file.sync_all()
            })
            .and_then(|_| fs::rename(&tmp_path, &self.path))
            .map_err(io_err)?;

        Ok((document, previous))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn set_get_remove_round_trip_through_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = LocalStore::open(&path);
        store.set("previousRoute", &"/shop".to_string()).unwrap();

        let reopened = LocalStore::open(&path);
        assert_eq!(reopened.get::<String>("previousRoute").as_deref(), Some("/shop"));

        assert!(reopened.remove("previousRoute").unwrap());
        assert!(!reopened.remove("previousRoute").unwrap());
        assert!(LocalStore::open(&path).get::<String>("previousRoute").is_none());
    }

    #[test]
    fn separate_handles_keep_each_others_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let first = LocalStore::open(&path);
        let second = LocalStore::open(&path);

        first.set("pendingOrder", &"ORDER-1".to_string()).unwrap();
        second.set("previousRoute", &"/shop".to_string()).unwrap();

        let reopened = LocalStore::open(&path);
        assert_eq!(reopened.get::<String>("pendingOrder").as_deref(), Some("ORDER-1"));
        assert_eq!(reopened.get::<String>("previousRoute").as_deref(), Some("/shop"));

        // The second handle picked up the first one's key while writing.
        assert_eq!(second.get::<String>("pendingOrder").as_deref(), Some("ORDER-1"));
        assert!(second.remove("pendingOrder").unwrap());
        assert!(LocalStore::open(&path).get::<String>("pendingOrder").is_none());
    }

    #[test]
    fn removing_key_written_elsewhere_reports_presence() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let stale = LocalStore::open(&path);
        LocalStore::open(&path)
            .set("checkoutInfo", &"ana@example.com".to_string())
            .unwrap();

        assert!(stale.remove("checkoutInfo").unwrap());
        assert!(!stale.remove("checkoutInfo").unwrap());
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{not json").unwrap();

        let store = LocalStore::open(&path);
        assert_eq!(store.rehydrate(), PersistedSlices::default());
    }
}
