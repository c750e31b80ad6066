//! Sparse value vectors keyed by flag masks.
//!
//! A [`SparseValueVector`] stores one `f32` per key of its type mask, packed
//! densely in ascending bit order:
//!
//! ```text
//! types  = 0b1_0000_0101   (Hp, Energy, Attack)
//! values = [ hp, energy, attack ]
//!            ^    ^       ^
//!            bit0 bit2    bit8
//! ```
//!
//! Reads of untracked keys return `0.0`. Writes require the key to already be
//! part of the mask; widening and arithmetic build new vectors over the union
//! of both masks.

mod accessor;
mod ops;
#[cfg(feature = "serde")]
mod serialize;

use arrayvec::ArrayVec;

use crate::config::StatConfig;
use crate::error::{StatError, StatResult};
use crate::flags::{BitFlagSet, FlagKey};

pub use accessor::{Accessor, AccessorCache};

const ZERO: f32 = 0.0;

/// Dense storage for the values of a vector. Fixed capacity, never allocates.
pub(crate) type Values = ArrayVec<f32, { StatConfig::MAX_FLAGS }>;

/// Value container holding entries only for the keys present in its mask.
#[derive(Clone, PartialEq)]
pub struct SparseValueVector<K> {
    types: BitFlagSet<K>,
    values: Values,
}

impl<K: FlagKey> SparseValueVector<K> {
    /// Creates a zero-filled vector tracking every key of `types`.
    pub fn new(types: BitFlagSet<K>) -> Self {
        let mut values = Values::new();
        values.extend(core::iter::repeat_n(0.0, types.count()));
        Self { types, values }
    }

    /// Creates an empty vector (no tracked keys).
    pub fn empty() -> Self {
        Self::new(BitFlagSet::empty())
    }

    /// Builds a vector from `(key, value)` pairs. Later pairs overwrite earlier
    /// ones for the same key.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, f32)>) -> Self {
        let mut staged: ArrayVec<(K, f32), { StatConfig::MAX_FLAGS }> = ArrayVec::new();
        for (key, value) in pairs {
            match staged.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = value,
                None => staged.push((key, value)),
            }
        }

        let types: BitFlagSet<K> = staged.iter().map(|(key, _)| *key).collect();
        let mut vector = Self::new(types);
        for (key, value) in staged {
            if let Some(slot) = vector.index_of(key) {
                vector.values[slot] = value;
            }
        }
        vector
    }

    /// Mask of tracked keys.
    #[inline]
    pub fn types(&self) -> BitFlagSet<K> {
        self.types
    }

    /// Number of tracked keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no key is tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if `key` is tracked.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.types.has(key)
    }

    /// Dense slot of `key`, or `None` if the key is not tracked.
    ///
    /// Walks the set bits of the mask counting population until the key's bit
    /// is reached. Masks hold at most 64 keys; callers doing repeated lookups
    /// for the same mask should go through an [`AccessorCache`].
    pub fn index_of(&self, key: K) -> Option<usize> {
        let target = key.bit();
        let mut slot = 0;
        for (bit, _) in self.types.iter() {
            if bit == target {
                return Some(slot);
            }
            if bit > target {
                break;
            }
            slot += 1;
        }
        None
    }

    /// Value of `key`, or `0.0` if the key is not tracked.
    pub fn get(&self, key: K) -> f32 {
        self.index_of(key).map_or(ZERO, |slot| self.values[slot])
    }

    /// Overwrites the value of a tracked key.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::KeyNotPresent`] if `key` is not part of the mask.
    pub fn set(&mut self, key: K, value: f32) -> StatResult<()> {
        let slot = self.index_of(key).ok_or(StatError::KeyNotPresent {
            bit: key.bit(),
            mask: self.types.bits(),
        })?;
        self.values[slot] = value;
        Ok(())
    }

    /// Returns a copy tracking `types | self.types()`. Existing values keep
    /// their keys; new slots are zero.
    pub fn widened(&self, types: BitFlagSet<K>) -> Self {
        let union = self.types | types;
        if union == self.types {
            return self.clone();
        }

        let mut widened = Self::new(union);
        let mut source = self.values.iter();
        for (slot, (_, key)) in union.iter().enumerate() {
            if self.types.has(key) {
                if let Some(value) = source.next() {
                    widened.values[slot] = *value;
                }
            }
        }
        widened
    }

    /// Zeroes every value in place. The mask is unchanged.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0.0);
    }

    /// Iterates `(key, value)` pairs in ascending bit order.
    pub fn iter(&self) -> impl Iterator<Item = (K, f32)> + '_ {
        self.types.keys().zip(self.values.iter().copied())
    }

    /// Dense values in ascending bit order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Compares two vectors key by key over the union of their masks, treating
    /// untracked keys as `0.0`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        (self.types | other.types)
            .keys()
            .all(|key| (self.get(key) - other.get(key)).abs() <= tolerance)
    }

    pub(crate) fn value_at(&self, slot: usize) -> f32 {
        self.values[slot]
    }

    pub(crate) fn set_at(&mut self, slot: usize, value: f32) {
        self.values[slot] = value;
    }
}

impl<K: FlagKey> Default for SparseValueVector<K> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<K: FlagKey> core::fmt::Debug for SparseValueVector<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: FlagKey> core::ops::Index<K> for SparseValueVector<K> {
    type Output = f32;

    /// Same semantics as [`SparseValueVector::get`]: untracked keys read as `0.0`.
    fn index(&self, key: K) -> &f32 {
        self.index_of(key).map_or(&ZERO, |slot| &self.values[slot])
    }
}

impl<K: FlagKey> FromIterator<(K, f32)> for SparseValueVector<K> {
    fn from_iter<I: IntoIterator<Item = (K, f32)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
