//! A small keyed cache with explicit invalidation.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V: Clone> QueryCache<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    /// Drop every entry. Called after any mutation, since a write can change
    /// the result of every query.
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
