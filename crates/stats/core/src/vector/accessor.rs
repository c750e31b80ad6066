//! Memoised per-key slot lookups.
//!
//! [`SparseValueVector::index_of`] walks the mask on every call. Hot readers
//! (combat formulas reading the same stat every tick) resolve the slot once
//! per mask through an [`Accessor`] and reuse it. Caches are plain values owned
//! by whoever reads; nothing is shared across unrelated vectors.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::trace;

use super::SparseValueVector;
use crate::error::{StatError, StatResult};
use crate::flags::{BitFlagSet, FlagKey};

/// Resolved slot of one key inside vectors of one mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accessor<K: FlagKey> {
    key: K,
    types: BitFlagSet<K>,
    slot: Option<usize>,
}

impl<K: FlagKey> Accessor<K> {
    /// Resolves `key` against vectors tracking exactly `types`.
    pub fn new(types: BitFlagSet<K>, key: K) -> Self {
        // Slot = number of tracked keys below `key`.
        let slot = types
            .has(key)
            .then(|| (types.bits() & (key.mask() - 1)).count_ones() as usize);
        Self { key, types, slot }
    }

    /// Key this accessor reads and writes.
    pub fn key(&self) -> K {
        self.key
    }

    /// Mask the slot was resolved against.
    pub fn types(&self) -> BitFlagSet<K> {
        self.types
    }

    /// Dense slot, or `None` if the mask does not track the key.
    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// Reads the key from `vector`.
    ///
    /// Vectors of another mask (an aggregate widened by a new modifier, for
    /// instance) are served through a fresh lookup.
    pub fn get(&self, vector: &SparseValueVector<K>) -> f32 {
        if vector.types() != self.types {
            self.trace_mismatch(vector);
            return vector.get(self.key);
        }
        self.slot.map_or(0.0, |slot| vector.value_at(slot))
    }

    /// Writes the key into `vector`.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::KeyNotPresent`] if the vector does not track the key.
    pub fn set(&self, vector: &mut SparseValueVector<K>, value: f32) -> StatResult<()> {
        if vector.types() != self.types {
            self.trace_mismatch(vector);
            return vector.set(self.key, value);
        }
        match self.slot {
            Some(slot) => {
                vector.set_at(slot, value);
                Ok(())
            }
            None => Err(StatError::KeyNotPresent {
                bit: self.key.bit(),
                mask: self.types.bits(),
            }),
        }
    }

    fn trace_mismatch(&self, vector: &SparseValueVector<K>) {
        trace!(
            target: "stat_core::accessor",
            key = ?self.key,
            expected = self.types.bits(),
            actual = vector.types().bits(),
            "accessor used on a vector of another mask"
        );
    }
}

/// Lazily built accessors for every key read from vectors of one mask.
#[derive(Clone, Debug)]
pub struct AccessorCache<K: FlagKey> {
    types: BitFlagSet<K>,
    accessors: HashMap<K, Accessor<K>>,
}

impl<K: FlagKey + Hash> AccessorCache<K> {
    /// Creates an empty cache for vectors tracking `types`.
    pub fn new(types: BitFlagSet<K>) -> Self {
        Self {
            types,
            accessors: HashMap::new(),
        }
    }

    /// Creates a cache matching the mask of `vector`.
    pub fn for_vector(vector: &SparseValueVector<K>) -> Self {
        Self::new(vector.types())
    }

    /// Mask the cache resolves against.
    pub fn types(&self) -> BitFlagSet<K> {
        self.types
    }

    /// Accessor for `key`, resolved on first use.
    pub fn accessor(&mut self, key: K) -> Accessor<K> {
        let types = self.types;
        *self
            .accessors
            .entry(key)
            .or_insert_with(|| Accessor::new(types, key))
    }

    /// Reads `key` from `vector` through the cached accessor.
    pub fn get(&mut self, vector: &SparseValueVector<K>, key: K) -> f32 {
        self.accessor(key).get(vector)
    }

    /// Writes `key` into `vector` through the cached accessor.
    pub fn set(&mut self, vector: &mut SparseValueVector<K>, key: K, value: f32) -> StatResult<()> {
        self.accessor(key).set(vector, value)
    }

    /// Number of memoised accessors.
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
