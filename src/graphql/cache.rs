//! In-memory response cache shared by every clone of a client.
//!
//! Entries are keyed by operation name plus the canonical JSON of the
//! variables. `serde_json::Map` keeps keys sorted, so two equal variable
//! sets always produce the same key.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

/// How a query interacts with the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPolicy {
    /// Serve from cache when present, otherwise fetch and store.
    #[default]
    CacheFirst,
    /// Always fetch, then store the fresh response.
    NetworkOnly,
    /// Always fetch and never touch the cache.
    NoCache,
}

impl FetchPolicy {
    pub fn reads_cache(&self) -> bool {
        matches!(self, FetchPolicy::CacheFirst)
    }

    pub fn writes_cache(&self) -> bool {
        matches!(self, FetchPolicy::CacheFirst | FetchPolicy::NetworkOnly)
    }
}

#[derive(Clone, Default)]
pub struct ResponseCache {
    inner: Arc<RwLock<HashMap<String, Value>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(operation: &str, variables: &Value) -> String {
        format!("{}:{}", operation, variables)
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.read().get(key).cloned()
    }

    pub fn insert(&self, key: String, data: Value) {
        self.inner.write().insert(key, data);
    }

    /// Drop every entry for an operation, whatever its variables.
    pub fn evict_operation(&self, operation: &str) -> usize {
        let prefix = format!("{}:", operation);
        let mut guard = self.inner.write();
        let before = guard.len();
        guard.retain(|key, _| !key.starts_with(&prefix));
        before - guard.len()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
