//! Ordered Store Module
//!
//! Key-ordered entry storage with constant-time positional access, used by
//! the sampling eviction to draw uniformly random entries.

use std::collections::BTreeMap;

use crate::cache::CacheEntry;

/// Result of inserting into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was new and a slot was allocated
    Inserted,
    /// The key already existed; only its value was replaced
    Updated,
}

// == Ordered Store ==
/// Entries keyed by a unique string key.
///
/// Layout:
/// - `index` maps each key to its slot, ordered lexicographically
/// - `slots` holds the entries densely, so `at(i)` is a plain index
///
/// Removing a slot swaps the last slot into the hole and re-points its key,
/// which keeps `slots` dense without shifting. Slot positions therefore do not
/// follow key order; `iter` walks `index` when key order matters.
#[derive(Debug)]
pub struct OrderedStore<V> {
    index: BTreeMap<String, usize>,
    slots: Vec<CacheEntry<V>>,
}

impl<V> Default for OrderedStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> OrderedStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            index: BTreeMap::new(),
            slots: Vec::new(),
        }
    }

    // == Insert ==
    /// Inserts an entry, or updates the value of the existing entry with the
    /// same key. On update the stored `expire_at` is left untouched and the
    /// rest of `entry` is dropped.
    pub fn insert(&mut self, entry: CacheEntry<V>) -> InsertOutcome {
        if let Some(&pos) = self.index.get(&entry.key) {
            self.slots[pos].value = entry.value;
            return InsertOutcome::Updated;
        }

        self.index.insert(entry.key.clone(), self.slots.len());
        self.slots.push(entry);
        InsertOutcome::Inserted
    }

    // == Find ==
    /// Looks up the entry for `key`.
    pub fn find(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.index.get(key).map(|&pos| &self.slots[pos])
    }

    /// Returns true if `key` is stored.
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Remove ==
    /// Removes the entry for `key`, if any.
    pub fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let pos = *self.index.get(key)?;
        self.remove_at(pos)
    }

    /// Removes the entry occupying slot `pos`.
    pub fn remove_at(&mut self, pos: usize) -> Option<CacheEntry<V>> {
        if pos >= self.slots.len() {
            return None;
        }

        let removed = self.slots.swap_remove(pos);
        self.index.remove(&removed.key);

        // The former last slot now lives at `pos`
        if let Some(moved) = self.slots.get(pos) {
            if let Some(slot) = self.index.get_mut(&moved.key) {
                *slot = pos;
            }
        }

        Some(removed)
    }

    // == Positional Access ==
    /// Returns the entry in slot `pos` (`pos < len()`).
    pub fn at(&self, pos: usize) -> Option<&CacheEntry<V>> {
        self.slots.get(pos)
    }

    // == Length ==
    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // == Iteration ==
    /// Walks all entries in key order. Every call starts a fresh traversal.
    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry<V>> + '_ {
        self.index.values().map(move |&pos| &self.slots[pos])
    }
}
