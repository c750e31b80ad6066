use core::iter::FusedIterator;
use core::marker::PhantomData;

use super::FlagKey;

/// Iterator over the set bits of a [`BitFlagSet`](super::BitFlagSet).
///
/// Yields `(bit_index, key)` in ascending bit order. Bits that do not name a
/// key of `K` are skipped; sets built through the public API never contain them.
#[derive(Clone, Debug)]
pub struct Flags<K> {
    remaining: u64,
    _key: PhantomData<fn() -> K>,
}

impl<K> Flags<K> {
    pub(crate) const fn new(bits: u64) -> Self {
        Self {
            remaining: bits,
            _key: PhantomData,
        }
    }
}

impl<K: FlagKey> Iterator for Flags<K> {
    type Item = (u8, K);

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining != 0 {
            let bit = self.remaining.trailing_zeros() as u8;
            self.remaining &= self.remaining - 1;
            if let Some(key) = K::from_bit(bit) {
                return Some((bit, key));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.count_ones() as usize))
    }
}

impl<K: FlagKey> FusedIterator for Flags<K> {}
