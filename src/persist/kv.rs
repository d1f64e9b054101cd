//! Scoped key-value cache used for drafts, tab edits, previews, and the
//! prefill template
//!
//! The store is injected rather than ambient so tests can run against the
//! in-memory implementation deterministically. Writes are fire-and-forget:
//! a lost write at worst repeats a prefill or skips an optimization on the
//! next load, never corrupts anything.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use crate::persist::service::AttachmentCategory;
use crate::record::Tab;

/// Cache key scoped by purpose plus record or editor id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    purpose: String,
    scope: String,
}

impl CacheKey {
    pub fn new(purpose: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            purpose: purpose.into(),
            scope: scope.into(),
        }
    }

    /// Unsent draft of the whole record, keyed by editor and record
    pub fn draft(editor_id: &str, record_id: &str) -> Self {
        Self::new("draft", format!("{}:{}", editor_id, record_id))
    }

    /// The editor's most recently submitted record, used for prefilling
    pub fn prefill(editor_id: &str) -> Self {
        Self::new("prefill", editor_id)
    }

    /// Unsent edits of one logical tab
    pub fn tab(tab: Tab, record_id: &str) -> Self {
        Self::new(format!("tab:{}", tab.as_str()), record_id)
    }

    /// Locally cached attachment previews for one category
    pub fn previews(category: AttachmentCategory, record_id: &str) -> Self {
        Self::new(format!("previews:{}", category.as_str()), record_id)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.purpose, self.scope)
    }
}

/// String-keyed persistent store
///
/// Reads must tolerate malformed entries; callers treat unparseable values
/// as a cache miss.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &CacheKey) -> Option<String>;
    async fn set(&self, key: &CacheKey, value: &str);
    async fn remove(&self, key: &CacheKey);
}

/// In-memory store backing tests and the demo binary
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries, for assertions in tests
    pub fn len(&self) -> usize {
        self.entries.lock().expect("kv store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &CacheKey) -> Option<String> {
        self.entries
            .lock()
            .expect("kv store poisoned")
            .get(&key.to_string())
            .cloned()
    }

    async fn set(&self, key: &CacheKey, value: &str) {
        self.entries
            .lock()
            .expect("kv store poisoned")
            .insert(key.to_string(), value.to_owned());
    }

    async fn remove(&self, key: &CacheKey) {
        self.entries
            .lock()
            .expect("kv store poisoned")
            .remove(&key.to_string());
    }
}
