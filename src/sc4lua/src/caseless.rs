//! Case-insensitive string keyed map
//!
//! File names are matched case-insensitively no matter what the host file
//! system does, so lookups never depend on the platform.

use std::collections::btree_map::{self, BTreeMap};

/// Map with case-insensitive string keys, iterated in folded-key order
#[derive(Debug, Clone)]
pub struct CaselessMap<V> {
    entries: BTreeMap<String, (String, V)>,
}

impl<V> Default for CaselessMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

#[inline]
fn fold(key: &str) -> String {
    key.to_lowercase()
}

impl<V> CaselessMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert only if no key equal ignoring case exists
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert_if_absent(&mut self, key: &str, value: V) -> bool {
        match self.entries.entry(fold(key)) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert((key.to_string(), value));
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.entries
            .insert(fold(key), (key.to_string(), value))
            .map(|(_, v)| v)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&fold(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with their keys as first inserted
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }
}
