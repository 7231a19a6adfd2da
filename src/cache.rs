//! Rendered response cache.
//!
//! Rendered pages are kept per request path for a fixed TTL. Each entry also
//! carries the cache tags it was built from (`insight:{slug}:{locale}`, ...),
//! so a CMS change can drop exactly the affected entries by tag or by path.
//!
//! # Thread Safety
//!
//! `RwLock` lets request threads read concurrently; inserts and invalidation
//! take the write lock briefly.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// A rendered response body and the headers it is served with.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub body: String,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub tags: Vec<String>,
}

#[derive(Debug)]
struct Entry {
    response: CachedResponse,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct RenderCache {
    entries: RwLock<FxHashMap<String, Entry>>,
    ttl: Duration,
}

impl RenderCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            ttl,
        }
    }

    /// Fresh entry for `path`, if any. Stale entries are left for the next insert.
    pub fn get(&self, path: &str) -> Option<CachedResponse> {
        let entries = self.entries.read();
        let entry = entries.get(path)?;
        (entry.stored_at.elapsed() < self.ttl).then(|| entry.response.clone())
    }

    pub fn insert(&self, path: impl Into<String>, response: CachedResponse) {
        let entry = Entry {
            response,
            stored_at: Instant::now(),
        };
        self.entries.write().insert(path.into(), entry);
    }

    /// Drop every entry built from `tag`. Returns how many were removed.
    pub fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.response.tags.iter().any(|t| t == tag));
        before - entries.len()
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate_path(&self, path: &str) -> bool {
        self.entries.write().remove(path).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
