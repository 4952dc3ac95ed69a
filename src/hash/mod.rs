// Copyright 2026 The DsKernels Authors. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Universal hash family (H): a randomized 2-universal hash of integer keys
//! with re-seeding.
//!
//! ## Quick Start
//!
//! ```rust
//! use dskernels::hash::UniversalHash;
//!
//! let mut h = UniversalHash::new(1024);
//! let first = h.hash(42);
//! h.update(); // resample a1, a2, a3
//! let second = h.hash(42);
//! assert!(first < 1024 && second < 1024);
//! ```
//!
//! ## Formula
//!
//! Two independently-seeded instances of this family act as two independent
//! hash functions, which is exactly what the cuckoo hash table in
//! [`crate::cuckoo`] needs. Each instance holds three random **odd**
//! multipliers `a1, a2, a3` and a shift amount `q`; hashing folds the three
//! partial products together:
//!
//! ```text
//! hash_with(a, x) = (a * x) >> q
//! hash(key)        = (h1 ^ h2 ^ h3) % w
//! ```
//!
//! This is the formula used consistently throughout the reference C++
//! source's `hasher.cpp` (the source also contains an inconsistent
//! `>> (w - q)` variant in an earlier draft of the same file; this crate
//! picks the `>> q` / xor-then-modulo variant and does not implement the
//! other one).
//!
//! ## Performance
//!
//! - `hash`: O(1), three multiplications, two xors, one `%`.
//! - `update`: O(1), three fresh random samples.

use rand::rngs::ThreadRng;
use rand::Rng;

/// A randomized 2-universal hash function over `usize` keys (and, via
/// [`UniversalHash::hash_bytes`], over byte strings).
///
/// ## Invariants
/// - `a1`, `a2`, `a3` are always odd.
/// - `update()` resamples `a1`, `a2`, `a3` independently; with a real `Rng`
///   this changes at least one of them with probability 1 (the odd integers
///   in `[1, usize::MAX]` are not a singleton set).
/// - `hash(key)` is deterministic for fixed `a1, a2, a3, q, w`.
#[derive(Debug, Clone)]
pub struct UniversalHash {
    w: usize,
    q: u32,
    a1: usize,
    a2: usize,
    a3: usize,
}

impl UniversalHash {
    /// Creates a new hash family with target range `[0, w)`, seeded from the
    /// thread-local RNG.
    ///
    /// ## Panics
    /// Panics if `w == 0`: a zero-sized range makes `% w` undefined. Callers
    /// that need a fallible constructor should validate `w` themselves before
    /// calling; this mirrors `Vec::with_capacity`-style infallible
    /// constructors elsewhere in the standard library for parameters that
    /// are programmer errors rather than runtime conditions.
    pub fn new(w: usize) -> Self {
        Self::new_with_rng(w, &mut rand::thread_rng())
    }

    /// Creates a new hash family using the supplied random source, which is
    /// the concrete realization of the "randomness provider" collaborator:
    /// its only contract is producing uniform unsigned integers in a range,
    /// which is exactly [`rand::Rng`]'s contract.
    pub fn new_with_rng<R: Rng + ?Sized>(w: usize, rng: &mut R) -> Self {
        assert!(w > 0, "hash range w must be non-zero");
        let q = Self::sample_q(rng);
        let mut h = Self {
            w,
            q,
            a1: 1,
            a2: 1,
            a3: 1,
        };
        h.update_with_rng(rng);
        h
    }

    /// Resamples `a1`, `a2`, `a3` using the thread-local RNG.
    pub fn update(&mut self) {
        self.update_with_rng(&mut rand::thread_rng());
    }

    /// Resamples `a1`, `a2`, `a3` using the supplied random source.
    pub fn update_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.a1 = Self::rand_odd(rng);
        self.a2 = Self::rand_odd(rng);
        self.a3 = Self::rand_odd(rng);
    }

    /// Hashes an integer key into `[0, w)`.
    pub fn hash(&self, key: usize) -> usize {
        let h1 = self.hash_with(self.a1, key);
        let h2 = self.hash_with(self.a2, key);
        let h3 = self.hash_with(self.a3, key);
        (h1 ^ h2 ^ h3) % self.w
    }

    /// Hashes a byte string into `[0, w)` by folding per-byte sub-hashes
    /// (summed) and hashing the fold, mirroring `hasher.cpp`'s byte-string
    /// overload.
    pub fn hash_bytes(&self, bytes: &[u8]) -> usize {
        let folded = bytes
            .iter()
            .fold(0usize, |acc, &b| acc.wrapping_add(self.hash(b as usize)));
        self.hash(folded)
    }

    /// The configured output range `w`; `hash`/`hash_bytes` always return a
    /// value in `[0, w)`.
    pub fn range(&self) -> usize {
        self.w
    }

    fn hash_with(&self, a: usize, x: usize) -> usize {
        a.wrapping_mul(x) >> self.q
    }

    fn rand_odd<R: Rng + ?Sized>(rng: &mut R) -> usize {
        let n: usize = rng.gen_range(1..=usize::MAX);
        n | 1
    }

    /// Mirrors the source's `q = log2(W) - log2(n)` for a random positive
    /// `n`, implemented with integer bit-widths instead of floating-point
    /// `log2` (exact, and avoids a `<math.h>` dependency).
    fn sample_q<R: Rng + ?Sized>(rng: &mut R) -> u32 {
        let n: u32 = rng.gen_range(1..=i32::MAX as u32);
        let total_bits = usize::BITS;
        let n_bits = u32::BITS - n.leading_zeros();
        total_bits.saturating_sub(n_bits).saturating_sub(1).max(1)
    }
}

/// Convenience alias for a hash family seeded from the default thread RNG;
/// named so call sites reading `ThreadRngHash::new(w)` read naturally next
/// to `UniversalHash::new_with_rng`.
pub type ThreadRngHash = UniversalHash;

#[allow(dead_code)]
fn _assert_thread_rng_is_an_rng(_: ThreadRng) {}
