//! Operators over sparse vectors.
//!
//! Every operator is implemented on references and returns a new vector; the
//! operands are never mutated.

use core::ops::{Add, BitOr, Sub};

use super::SparseValueVector;
use crate::flags::FlagKey;

impl<K: FlagKey> BitOr<K> for &SparseValueVector<K> {
    type Output = SparseValueVector<K>;

    /// Widens the mask to include `key`. Already tracked keys are a no-op.
    fn bitor(self, key: K) -> SparseValueVector<K> {
        self.widened(key.into())
    }
}

impl<K: FlagKey> BitOr<K> for SparseValueVector<K> {
    type Output = SparseValueVector<K>;

    fn bitor(self, key: K) -> SparseValueVector<K> {
        if self.contains(key) {
            return self;
        }
        &self | key
    }
}

impl<K: FlagKey> Add for &SparseValueVector<K> {
    type Output = SparseValueVector<K>;

    fn add(self, rhs: Self) -> SparseValueVector<K> {
        combine(self, rhs, |left, right| left + right)
    }
}

impl<K: FlagKey> Sub for &SparseValueVector<K> {
    type Output = SparseValueVector<K>;

    fn sub(self, rhs: Self) -> SparseValueVector<K> {
        combine(self, rhs, |left, right| left - right)
    }
}

/// Builds `lhs op rhs` over the union of both masks.
///
/// Each slot starts from the left value (zero when the key is right-only) and
/// is then combined with the right value when the right side tracks the key.
fn combine<K: FlagKey>(
    lhs: &SparseValueVector<K>,
    rhs: &SparseValueVector<K>,
    op: impl Fn(f32, f32) -> f32,
) -> SparseValueVector<K> {
    let union = lhs.types | rhs.types;
    let mut result = SparseValueVector::new(union);

    let mut left = lhs.values.iter().copied();
    let mut right = rhs.values.iter().copied();
    for (slot, (_, key)) in union.iter().enumerate() {
        let mut value = if lhs.types.has(key) {
            left.next().unwrap_or_default()
        } else {
            0.0
        };
        if rhs.types.has(key) {
            value = op(value, right.next().unwrap_or_default());
        }
        result.values[slot] = value;
    }
    result
}
