//! Fixed-width flag sets over enum-like key spaces.
//!
//! A [`FlagKey`] names one semantic channel (a stat type, a wallet currency, a
//! condition id) by its bit index in `0..64`. [`BitFlagSet`] combines keys of a
//! single key space into a `u64` mask. Enumeration always walks set bits in
//! ascending bit order, which is the order [`SparseValueVector`] uses for its
//! dense storage.
//!
//! [`SparseValueVector`]: crate::vector::SparseValueVector

mod iter;

use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use crate::config::StatConfig;
use crate::error::{StatError, StatResult};

pub use iter::Flags;

/// A key that occupies one bit of a 64-bit mask.
///
/// Implementations must guarantee `bit() < 64` and that
/// `from_bit(key.bit()) == Some(key)`.
pub trait FlagKey: Copy + Eq + fmt::Debug {
    /// Bit index of this key.
    fn bit(self) -> u8;

    /// Key stored at `bit`, or `None` if the key space has no such key.
    fn from_bit(bit: u8) -> Option<Self>;

    /// Single-bit mask for this key.
    #[inline]
    fn mask(self) -> u64 {
        1u64 << self.bit()
    }
}

/// Set of keys drawn from one key space, stored as a 64-bit mask.
///
/// All operators are pure: `a | b` and `a & b` build new sets and never mutate
/// their operands.
pub struct BitFlagSet<K> {
    bits: u64,
    _key: PhantomData<fn() -> K>,
}

impl<K: FlagKey> BitFlagSet<K> {
    /// The empty set.
    pub const EMPTY: Self = Self::from_bits_unchecked(0);

    /// Creates an empty set.
    pub const fn empty() -> Self {
        Self::EMPTY
    }

    pub(crate) const fn from_bits_unchecked(bits: u64) -> Self {
        Self {
            bits,
            _key: PhantomData,
        }
    }

    /// Creates a set from raw mask bits.
    ///
    /// Fails when any set bit does not name a key of `K`, so that every set bit
    /// can be enumerated back into a key.
    pub fn from_bits(bits: u64) -> StatResult<Self> {
        let set = Self::from_bits_unchecked(bits);
        let invalid = set
            .raw_bits()
            .filter(|bit| K::from_bit(*bit).is_none())
            .fold(0u64, |acc, bit| acc | (1u64 << bit));

        if invalid == 0 {
            Ok(set)
        } else {
            Err(StatError::InvalidFlagBits { bits: invalid })
        }
    }

    /// Creates a set containing a single key.
    pub fn from_key(key: K) -> Self {
        Self::from_bits_unchecked(key.mask())
    }

    /// Raw mask bits.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Number of keys in the set.
    #[inline]
    pub const fn count(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Returns true if the set contains no keys.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns true if `key` is in the set.
    #[inline]
    pub fn has(&self, key: K) -> bool {
        self.bits & key.mask() != 0
    }

    /// Returns true if every key of `other` is in this set.
    #[inline]
    pub fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Adds `key` to the set.
    pub fn insert(&mut self, key: K) {
        self.bits |= key.mask();
    }

    /// Removes `key` from the set.
    pub fn remove(&mut self, key: K) {
        self.bits &= !key.mask();
    }

    /// Key with the lowest bit index.
    pub fn first(&self) -> Option<K> {
        if self.bits == 0 {
            return None;
        }
        K::from_bit(self.bits.trailing_zeros() as u8)
    }

    /// Key with the highest bit index.
    pub fn last(&self) -> Option<K> {
        if self.bits == 0 {
            return None;
        }
        K::from_bit((StatConfig::MAX_FLAGS as u32 - 1 - self.bits.leading_zeros()) as u8)
    }

    /// Iterates `(bit_index, key)` pairs in ascending bit order.
    ///
    /// The iterator borrows nothing; calling `iter` again restarts enumeration.
    pub fn iter(&self) -> Flags<K> {
        Flags::new(self.bits)
    }

    /// Iterates the keys of the set in ascending bit order.
    pub fn keys(self) -> impl Iterator<Item = K> {
        self.iter().map(|(_, key)| key)
    }

    fn raw_bits(self) -> impl Iterator<Item = u8> {
        let mut remaining = self.bits;
        core::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let bit = remaining.trailing_zeros() as u8;
            remaining &= remaining - 1;
            Some(bit)
        })
    }
}

impl<K> Clone for BitFlagSet<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for BitFlagSet<K> {}

impl<K> PartialEq for BitFlagSet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<K> Eq for BitFlagSet<K> {}

impl<K> core::hash::Hash for BitFlagSet<K> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<K> Default for BitFlagSet<K> {
    fn default() -> Self {
        Self {
            bits: 0,
            _key: PhantomData,
        }
    }
}

impl<K: FlagKey> fmt::Debug for BitFlagSet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys()).finish()
    }
}

impl<K: FlagKey> BitOr for BitFlagSet<K> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits | rhs.bits)
    }
}

impl<K: FlagKey> BitOr<K> for BitFlagSet<K> {
    type Output = Self;

    fn bitor(self, rhs: K) -> Self {
        Self::from_bits_unchecked(self.bits | rhs.mask())
    }
}

impl<K: FlagKey> BitOrAssign for BitFlagSet<K> {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl<K: FlagKey> BitOrAssign<K> for BitFlagSet<K> {
    fn bitor_assign(&mut self, rhs: K) {
        self.insert(rhs);
    }
}

impl<K: FlagKey> BitAnd for BitFlagSet<K> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::from_bits_unchecked(self.bits & rhs.bits)
    }
}

impl<K: FlagKey> BitAndAssign for BitFlagSet<K> {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl<K: FlagKey> FromIterator<K> for BitFlagSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        iter.into_iter().fold(Self::empty(), |set, key| set | key)
    }
}

impl<K: FlagKey> From<K> for BitFlagSet<K> {
    fn from(key: K) -> Self {
        Self::from_key(key)
    }
}

impl<K: FlagKey> IntoIterator for BitFlagSet<K> {
    type Item = (u8, K);
    type IntoIter = Flags<K>;

    fn into_iter(self) -> Flags<K> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::StatType;

    #[test]
    fn empty_set_has_no_keys() {
        let set = BitFlagSet::<StatType>::empty();
        assert_eq!(set.count(), 0);
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
        assert_eq!(set.last(), None);
        assert_eq!(set.first(), None);
    }

    #[test]
    fn union_and_intersection_are_pure() {
        let a: BitFlagSet<StatType> = [StatType::Hp, StatType::Attack].into_iter().collect();
        let b: BitFlagSet<StatType> = [StatType::Attack, StatType::Armor].into_iter().collect();

        let union = a | b;
        let inter = a & b;

        assert_eq!(union.count(), 3);
        assert_eq!(inter.count(), 1);
        assert!(inter.has(StatType::Attack));
        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
    }

    #[test]
    fn enumerates_in_ascending_bit_order() {
        let set = BitFlagSet::from_key(StatType::Speed) | StatType::Hp | StatType::Armor;
        let bits: Vec<u8> = set.iter().map(|(bit, _)| bit).collect();
        assert_eq!(bits, vec![StatType::Hp.bit(), StatType::Armor.bit(), StatType::Speed.bit()]);

        // Restartable
        assert_eq!(set.iter().count(), 3);
        assert_eq!(set.first(), Some(StatType::Hp));
        assert_eq!(set.last(), Some(StatType::Speed));
    }

    #[test]
    fn from_bits_rejects_unknown_keys() {
        let err = BitFlagSet::<StatType>::from_bits(1u64 << 63).unwrap_err();
        assert_eq!(err, StatError::InvalidFlagBits { bits: 1u64 << 63 });

        let ok = BitFlagSet::<StatType>::from_bits(StatType::Hp.mask()).unwrap();
        assert!(ok.has(StatType::Hp));
    }

    #[test]
    fn insert_and_remove() {
        let mut set = BitFlagSet::<StatType>::empty();
        set |= StatType::Evasion;
        set.insert(StatType::Hp);
        assert!(set.contains(BitFlagSet::from_key(StatType::Hp)));
        set.remove(StatType::Hp);
        assert!(!set.has(StatType::Hp));
        assert_eq!(set.count(), 1);
    }
}
