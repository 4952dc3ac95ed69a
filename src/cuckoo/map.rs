// Copyright 2026 The DsKernels Authors. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! `CuckooMap<K, V>`: a key/value adapter over [`CuckooSet`].

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::hash::UniversalHash;

use super::set::HashFamily;
use super::CuckooSet;

/// A key/value pair that compares and hashes by `K` alone, so that
/// [`CuckooSet`] can store it directly while still allowing an `insert` of
/// an existing key to overwrite its value (this is the "overwrite in place"
/// branch of `CuckooSet::place`). The value half is `Option<V>` so that a
/// bare probe key, used by `get`/`remove`, which have a `K` but no `V` in
/// hand, can be built without requiring `V: Default`; only entries actually
/// inserted ever carry `Some`.
///
/// Grounded on the `KeyValuePair`-by-key pattern used for HAMT entries in
/// the example corpus, adapted here to an owned `(K, Option<V>)` tuple
/// rather than a borrowed byte-slice key.
#[derive(Clone)]
struct Entry<K, V>(K, Option<V>);

impl<K, V> Entry<K, V> {
    fn probe(key: K) -> Self {
        Entry(key, None)
    }

    fn stored(key: K, value: V) -> Self {
        Entry(key, Some(value))
    }
}

impl<K: PartialEq, V> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K: Eq, V> Eq for Entry<K, V> {}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({:?}, {:?})", self.0, self.1)
    }
}

/// A key/value map built on the same two-table guaranteed-O(1)-lookup
/// design as [`CuckooSet`]. Internally this is `CuckooSet<Entry<K, V>>`
/// where `Entry` compares and hashes by key only, so inserting an existing
/// key overwrites its value in place instead of creating a duplicate slot.
#[derive(Clone)]
pub struct CuckooMap<K, V, H: HashFamily = UniversalHash> {
    inner: CuckooSet<Entry<K, V>, H>,
}

impl<K, V, H> Default for CuckooMap<K, V, H>
where
    K: Hash + Eq + Clone,
    V: Clone,
    H: HashFamily,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> CuckooMap<K, V, H>
where
    K: Hash + Eq + Clone,
    V: Clone,
    H: HashFamily,
{
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            inner: CuckooSet::new(),
        }
    }

    /// Creates an empty map whose backing tables start at `capacity` slots
    /// each.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: CuckooSet::with_capacity(capacity),
        }
    }

    /// Number of key/value pairs stored.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Whether the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Inserts `key -> value`. If `key` was already present its value is
    /// replaced; returns the previous value, if any.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let previous = self.get(&key).cloned();
        self.inner.insert(Entry::stored(key, value));
        previous
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.get(key).cloned();
        if value.is_some() {
            self.inner.remove(&Entry::probe(key.clone()));
        }
        value
    }

    /// Looks up the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner
            .lookup(&Entry::probe(key.clone()))
            .and_then(|entry| entry.1.as_ref())
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// An unordered snapshot of every stored key/value pair.
    pub fn items(&self) -> Vec<(&K, &V)> {
        self.inner
            .items()
            .into_iter()
            .filter_map(|e| e.1.as_ref().map(|v| (&e.0, v)))
            .collect()
    }
}
