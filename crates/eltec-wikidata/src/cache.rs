//! Per-run lookup memoization

use std::collections::HashMap;
use std::hash::Hash;

/// Work lookup key. The tag keeps VIAF ids and titles in separate key spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WorkKey {
    Viaf(String),
    Title(String),
}

/// Memoized lookups. A stored `None` means "looked up, nothing found".
#[derive(Debug)]
pub struct Memo<K> {
    entries: HashMap<K, Option<String>>,
}

impl<K: Eq + Hash> Memo<K> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Outer `None`: never looked up.
    pub fn get(&self, key: &K) -> Option<Option<&str>> {
        self.entries.get(key).map(|v| v.as_deref())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Return the cached value, running `resolve` only on the first call
    /// for `key`.
    pub fn get_or_resolve(
        &mut self,
        key: K,
        resolve: impl FnOnce() -> Option<String>,
    ) -> Option<String> {
        self.entries.entry(key).or_insert_with(resolve).clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash> Default for Memo<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Both caches for one run: authors by VIAF id, works by [`WorkKey`].
#[derive(Debug, Default)]
pub struct LookupCache {
    pub authors: Memo<String>,
    pub works: Memo<WorkKey>,
}
