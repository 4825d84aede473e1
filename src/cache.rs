//! Operation caches for ZDD computations.
//!
//! Each algebraic operator owns one memo table keyed by its operand handles.
//! The cached result handle is weak: the cache holds no reference of its own,
//! so entries can point at dead nodes. Such entries stay useful — a hit on a
//! dead result revives it instead of recomputing — and are purged only during
//! garbage collection.

use std::collections::HashMap;
use std::hash::Hash;

use crate::reference::ZddId;

/// A memo table from operand key to result handle.
#[derive(Debug, Clone)]
pub struct Cache<K> {
    map: HashMap<K, ZddId>,
    hits: usize,
    misses: usize,
}

impl<K: Eq + Hash> Default for Cache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Cache<K>
where
    K: Eq + Hash,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Looks up a cached result.
    pub fn get(&mut self, key: &K) -> Option<ZddId> {
        match self.map.get(key) {
            Some(&result) => {
                self.hits += 1;
                Some(result)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a result. The cache does not hold a reference to it.
    pub fn insert(&mut self, key: K, result: ZddId) {
        self.map.insert(key, result);
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&K, ZddId) -> bool) {
        self.map.retain(|key, &mut result| keep(key, result));
    }

    /// Drops all entries, keeping the hit/miss statistics.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }
}
