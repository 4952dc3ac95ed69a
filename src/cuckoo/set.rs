// Copyright 2026 The DsKernels Authors. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! The `CuckooSet<K, H>` container and the `HashFamily` abstraction it is
//! generic over.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::hash::UniversalHash;

use super::{max_load_factor, max_loop, INITIAL_CAPACITY};

/// A hash family usable by [`CuckooSet`], generic the way the reference
/// source's `_CuckooHashTable<T, H>` is templated over its hash class `H`.
///
/// The default, [`UniversalHash`], is what production code should use.
/// Tests substitute a counting wrapper to verify that [`CuckooSet::lookup`]
/// probes at most two slots.
pub trait HashFamily: Clone {
    /// Builds a fresh instance targeting output range `[0, range)`.
    fn new(range: usize) -> Self;

    /// Hashes an already-folded key into `[0, range)`.
    fn hash(&self, key: usize) -> usize;

    /// Resamples the family's internal randomness, changing its outputs.
    fn reseed(&mut self);
}

impl HashFamily for UniversalHash {
    fn new(range: usize) -> Self {
        UniversalHash::new(range)
    }

    fn hash(&self, key: usize) -> usize {
        UniversalHash::hash(self, key)
    }

    fn reseed(&mut self) {
        UniversalHash::update(self)
    }
}

fn fold_key<K: Hash>(k: &K) -> usize {
    let mut hasher = DefaultHasher::new();
    k.hash(&mut hasher);
    hasher.finish() as usize
}

/// An open-addressed 2-table set with guaranteed O(1) worst-case lookup.
///
/// See the module docs for the two-table/eviction-chain design. `K` must be
/// `Hash + Eq + Clone`: `Hash` and `Eq` so the table can locate and compare
/// keys, `Clone` because keys are moved between table slots during eviction
/// and because [`Clone`] on the whole set must deep-copy every stored key.
#[derive(Clone)]
pub struct CuckooSet<K, H: HashFamily = UniversalHash> {
    t1: Vec<Option<K>>,
    t2: Vec<Option<K>>,
    h1: H,
    h2: H,
    capacity: usize,
    size: usize,
}

impl<K, H> Default for CuckooSet<K, H>
where
    K: Hash + Eq + Clone,
    H: HashFamily,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> CuckooSet<K, H>
where
    K: Hash + Eq + Clone,
    H: HashFamily,
{
    /// Creates an empty table with the initial capacity (`r = 2`).
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty table whose two tables start at `capacity` slots
    /// each, rounded up to at least the initial capacity. Useful to avoid a
    /// handful of early `grow`s when the final size is roughly known ahead
    /// of time.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(INITIAL_CAPACITY);
        Self {
            t1: vec![None; capacity],
            t2: vec![None; capacity],
            h1: H::new(capacity),
            h2: H::new(capacity),
            capacity,
            size: 0,
        }
    }

    /// Number of keys currently stored.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the table holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Current capacity `r` of each of the two tables (the total slot count
    /// is `2r`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Inserts `k`. If an equal key is already stored, it is overwritten in
    /// place (useful for `CuckooMap`, whose entries compare equal by key but
    /// may carry a different value); returns whether a *new* key was added.
    pub fn insert(&mut self, k: K) -> bool {
        if self.load_factor() >= max_load_factor() {
            self.grow();
        }
        self.place(k)
    }

    /// Removes `k` if present. Returns whether something was removed;
    /// absence is not an error.
    pub fn remove(&mut self, k: &K) -> bool {
        let i1 = self.index1(k);
        if self.t1[i1].as_ref() == Some(k) {
            self.t1[i1] = None;
            self.size -= 1;
            return true;
        }
        let i2 = self.index2(k);
        if self.t2[i2].as_ref() == Some(k) {
            self.t2[i2] = None;
            self.size -= 1;
            return true;
        }
        false
    }

    /// Looks up `k`, probing exactly two slots (`T1[h1(k)]`, then
    /// `T2[h2(k)]`) regardless of load factor.
    pub fn lookup(&self, k: &K) -> Option<&K> {
        let i1 = self.index1(k);
        if let Some(found) = self.t1[i1].as_ref() {
            if found == k {
                return Some(found);
            }
        }
        let i2 = self.index2(k);
        if let Some(found) = self.t2[i2].as_ref() {
            if found == k {
                return Some(found);
            }
        }
        None
    }

    /// Whether `k` is stored. Equivalent to `lookup(k).is_some()`.
    pub fn contains(&self, k: &K) -> bool {
        self.lookup(k).is_some()
    }

    /// An unordered snapshot of every stored key. Iteration order is
    /// unspecified and callers must not rely on it.
    pub fn items(&self) -> Vec<&K> {
        self.t1
            .iter()
            .chain(self.t2.iter())
            .filter_map(|slot| slot.as_ref())
            .collect()
    }

    fn load_factor(&self) -> f64 {
        self.size as f64 / (2.0 * self.capacity as f64)
    }

    fn index1(&self, k: &K) -> usize {
        self.h1.hash(fold_key(k))
    }

    fn index2(&self, k: &K) -> usize {
        self.h2.hash(fold_key(k))
    }

    /// Overwrite-or-insert a single key, rehashing/reseeding as needed. This
    /// is the "place" step of the algorithm; the load-factor "grow" check
    /// happens in [`Self::insert`] before this is called.
    fn place(&mut self, k: K) -> bool {
        let i1 = self.index1(&k);
        if self.t1[i1].as_ref() == Some(&k) {
            self.t1[i1] = Some(k);
            return false;
        }
        let i2 = self.index2(&k);
        if self.t2[i2].as_ref() == Some(&k) {
            self.t2[i2] = Some(k);
            return false;
        }

        match self.try_insert_new(k) {
            Ok(()) => {
                self.size += 1;
                true
            }
            Err(homeless) => {
                // The chain filled every slot it touched except the very
                // last evicted key, which never found a home. Every other
                // live key (including the original insert request, which by
                // now has been swapped into some slot along the chain) is
                // still present in the tables, so collecting them plus the
                // homeless key gives the complete live set to rehash.
                let mut keys = self.drain_live_keys();
                keys.push(homeless);
                self.rehash_until_placed(keys);
                self.size += 1;
                true
            }
        }
    }

    /// Runs the bounded eviction chain starting from new key `x`. On success
    /// every touched slot, including `x`'s, ends up occupied. On failure the
    /// final evicted key, the one that never found a home, is returned so
    /// the caller can fold it back into a rehash batch.
    fn try_insert_new(&mut self, mut x: K) -> Result<(), K> {
        let loop_bound = max_loop(self.capacity);
        for _ in 0..loop_bound {
            let i = self.index1(&x);
            match self.t1[i].take() {
                None => {
                    self.t1[i] = Some(x);
                    return Ok(());
                }
                Some(evicted) => {
                    self.t1[i] = Some(x);
                    x = evicted;
                }
            }

            let j = self.index2(&x);
            match self.t2[j].take() {
                None => {
                    self.t2[j] = Some(x);
                    return Ok(());
                }
                Some(evicted) => {
                    self.t2[j] = Some(x);
                    x = evicted;
                }
            }
        }
        Err(x)
    }

    /// Empties both tables and returns every key that was stored, in no
    /// particular order.
    fn drain_live_keys(&mut self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.size);
        for slot in self.t1.iter_mut().chain(self.t2.iter_mut()) {
            if let Some(k) = slot.take() {
                keys.push(k);
            }
        }
        keys
    }

    /// Reseeds both hash functions and reinserts every key in `keys` into a
    /// fresh table of the current capacity, retrying with a fresh reseed
    /// whenever any single key's eviction chain is exhausted, until every
    /// key lands somewhere. Capacity does not change here, only the hash
    /// functions do.
    fn rehash_until_placed(&mut self, keys: Vec<K>) {
        loop {
            self.t1 = vec![None; self.capacity];
            self.t2 = vec![None; self.capacity];
            self.h1.reseed();
            self.h2.reseed();

            let mut all_placed = true;
            for k in &keys {
                if self.try_insert_new(k.clone()).is_err() {
                    all_placed = false;
                    break;
                }
            }
            if all_placed {
                log::debug!(
                    "cuckoo table reseeded to place {} live keys at capacity {}",
                    keys.len(),
                    self.capacity
                );
                return;
            }
        }
    }

    /// Doubles capacity and reinserts every live key.
    fn grow(&mut self) {
        let old_keys = self.drain_live_keys();
        self.capacity *= 2;
        self.t1 = vec![None; self.capacity];
        self.t2 = vec![None; self.capacity];
        self.h1 = H::new(self.capacity);
        self.h2 = H::new(self.capacity);
        log::trace!(
            "cuckoo table growing to capacity {} ({} live keys)",
            self.capacity,
            old_keys.len()
        );
        self.rehash_until_placed(old_keys);
    }
}
